//! Error types for concord.

use thiserror::Error;

/// Result type for concord operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for concord operations.
///
/// The metric and refinement algorithms themselves do not fail: degenerate
/// inputs yield zero scores and logged warnings. Errors come from loading
/// alignments and ontologies.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the core data types.
    #[error(transparent)]
    Core(#[from] concord_core::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
