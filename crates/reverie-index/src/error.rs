//! Index client error types.

use thiserror::Error;

/// Errors raised by a vector index client.
#[derive(Debug, Error)]
pub enum IndexError {
    /// HTTP request failed after reaching the server (TLS, decoding, redirects).
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The index service answered with a non-success status.
    #[error("Index returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The request was accepted but the index reported per-document errors.
    #[error("Index rejected document: {0}")]
    Rejected(String),

    /// The index could not be reached: connection refused or timed out.
    #[error("Index unavailable: {0}")]
    Unavailable(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for IndexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IndexError::Unavailable(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            IndexError::Unavailable(format!("Connection failed: {}", err))
        } else {
            IndexError::Http(err)
        }
    }
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
