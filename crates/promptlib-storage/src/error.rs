//! Storage error types.

use promptlib_core::PromptStatus;
use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from rusqlite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error (e.g., creating directories).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Moderation move that the status rules do not allow.
    #[error("Cannot move prompt from {from} to {to}")]
    InvalidTransition { from: PromptStatus, to: PromptStatus },
}

/// A stored column held a value outside its closed set.
#[derive(Debug, Error)]
#[error("invalid {column} value: {value}")]
pub struct InvalidColumnValue {
    pub column: &'static str,
    pub value: String,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
