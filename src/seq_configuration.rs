//! Configuration types for sequence operations

use serde::Deserialize;

use crate::error::{SeqError, SeqResult};

/// Separator used by `join_default`
pub const DEFAULT_JOIN_SEPARATOR: &str = ",";

/// Group size used by `chunk_default`
pub const DEFAULT_CHUNK_SIZE: usize = 1;

/// Defaults for the configurable corners of the combinator surface.
///
/// Every field has a default matching the plain combinators, so
/// `SeqConfig::default()` never changes behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeqConfig {
    /// Inserted between consecutive elements by `join_with`
    pub join_separator: String,
    /// Group size for `chunk_with`
    pub chunk_size: usize,
    /// Number of elements visited between cooperative yields in async traversal
    pub yield_every: usize,
}

impl Default for SeqConfig {
    fn default() -> Self {
        Self {
            join_separator: DEFAULT_JOIN_SEPARATOR.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            yield_every: 1,
        }
    }
}

impl SeqConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator used by `join_with`
    pub fn join_separator(mut self, separator: impl Into<String>) -> Self {
        self.join_separator = separator.into();
        self
    }

    /// Set the group size used by `chunk_with`
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Yield to the scheduler after every `n` elements instead of after each one
    pub fn yield_every(mut self, n: usize) -> Self {
        self.yield_every = n;
        self
    }

    /// Parse a configuration from JSON; missing fields keep their defaults.
    pub fn from_json(input: &str) -> SeqResult<Self> {
        let config: SeqConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the combinators cannot honor
    pub fn validate(&self) -> SeqResult<()> {
        if self.chunk_size == 0 {
            return Err(SeqError::InvalidArgument(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.yield_every == 0 {
            return Err(SeqError::InvalidArgument(
                "yield_every must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
