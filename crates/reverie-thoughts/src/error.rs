//! Error types for the thoughts crate.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while recording thoughts.
///
/// Index synchronization failures are deliberately absent: they are logged
/// by the service and never surface to callers.
#[derive(Debug, Error)]
pub enum ThoughtError {
    /// Database connection or operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Creation or update parameters were rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The subject type names no known subject kind.
    #[error("Unknown subject type: {0}")]
    UnknownSubjectKind(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid UUID format.
    #[error("Invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    /// Invalid data or state.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for thought operations.
pub type Result<T> = std::result::Result<T, ThoughtError>;
