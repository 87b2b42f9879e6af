//! Sequence error types.

use thiserror::Error;

/// Errors returned by change values and sequence operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// Malformed change set, empty change event, or a batch that breaks its contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Positional access outside the valid range
    #[error("Index {index} out of bounds (len: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Configuration could not be read, parsed or written
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SeqError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SeqError::InvalidArgument(msg.into())
    }

    /// Returns true for `InvalidArgument`.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SeqError::InvalidArgument(_))
    }

    /// Returns true for `IndexOutOfBounds`.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, SeqError::IndexOutOfBounds { .. })
    }
}
