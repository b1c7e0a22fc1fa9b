//! Error types for concord-core.

use thiserror::Error;

/// Result type for concord-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for concord-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// RDF document could not be parsed.
    #[error("RDF error: {0}")]
    Rdf(String),

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an RDF error.
    #[must_use]
    pub fn rdf(msg: impl Into<String>) -> Self {
        Self::Rdf(msg.into())
    }
}
