//! Error types for the content source module

use thiserror::Error;

/// Error type for content source operations
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested path does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The credential was rejected or is required
    #[error("Authentication error: {0}")]
    Auth(String),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// File content is not valid text
    #[error("Decode error: {0}")]
    Decode(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
