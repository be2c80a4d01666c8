pub mod error;
pub mod seq;
pub mod seq_configuration;
pub mod seq_iter_ext;

// Re-export all items from seq module at the crate root
pub use error::{SeqError, SeqResult};
pub use seq::*;
pub use seq_configuration::SeqConfig;
pub use seq_iter_ext::SeqIteratorExt;
