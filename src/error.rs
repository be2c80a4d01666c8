//! Error types for sequence operations
//!
//! The core never wraps failures raised by caller callbacks; those travel
//! through the `try_*` combinators unchanged. `SeqError` covers the few
//! conditions the library itself can detect.

use thiserror::Error;

/// Main error type for lazy-seq operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqError {
    /// Positional access past the end of the sequence
    #[error("index {index} out of range for sequence of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// A terminal operation that needs at least one element ran on an empty sequence
    #[error("{0} called on an empty sequence")]
    EmptySequence(&'static str),
    /// Argument rejected by a checked combinator
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Configuration could not be parsed or validated
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SeqError {
    fn from(err: serde_json::Error) -> Self {
        SeqError::Config(err.to_string())
    }
}

/// Result type for lazy-seq operations
pub type SeqResult<T> = Result<T, SeqError>;
