//! Error types for state rehydration.

use thiserror::Error;

/// Main error type for rehydration operations.
///
/// Only [`RehydrateError::Enumeration`] ever reaches a caller of
/// `restore`. The per-key variants are logged and turned into an
/// omitted slice.
#[derive(Debug, Error)]
pub enum RehydrateError {
    #[error("Failed to enumerate storage keys: {0}")]
    Enumeration(String),

    #[error("Failed to fetch key {key}: {reason}")]
    Fetch { key: String, reason: String },

    #[error("No value stored for key: {0}")]
    MissingValue(String),

    #[error("Deserialization error for {key}: {reason}")]
    Deserialization { key: String, reason: String },

    #[error("Transform {transform} failed for {key}: {reason}")]
    Transform {
        key: String,
        transform: String,
        reason: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for RehydrateError {
    fn from(e: serde_json::Error) -> Self {
        RehydrateError::Deserialization {
            key: String::new(),
            reason: e.to_string(),
        }
    }
}

/// Result type for rehydration operations.
pub type Result<T> = std::result::Result<T, RehydrateError>;
