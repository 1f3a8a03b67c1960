//! Error types for the repo-digest crate

use thiserror::Error;

use crate::model::GenerationError;
use crate::source::SourceError;
use crate::storage::StorageError;

/// Result type for repo-digest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for repo-digest operations
#[derive(Debug, Error)]
pub enum Error {
    /// The repository location could not be split into owner and name
    #[error("Invalid repository reference: {0}")]
    InvalidReferenceFormat(String),

    /// Listing or reading from the content source failed
    #[error("Content source unavailable: {0}")]
    SourceUnavailable(String),

    /// The content source returned bytes that are not text
    #[error("Decode error: {0}")]
    Decode(String),

    /// The text-generation service failed
    #[error("Generation failure: {0}")]
    Generation(#[from] GenerationError),

    /// Writing or reading persisted artifacts failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Startup configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted artifact required by the command is absent or empty
    #[error("Missing artifact: {0}")]
    MissingArtifact(String),
}

impl From<SourceError> for Error {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Decode(message) => Error::Decode(message),
            other => Error::SourceUnavailable(other.to_string()),
        }
    }
}
