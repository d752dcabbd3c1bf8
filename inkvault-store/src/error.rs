//! Error types for the persistence layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user with this username already exists.
    #[error("user already exists: {0}")]
    DuplicateUser(String),

    /// A stored row could not be decoded. Treated as unrecoverable data
    /// loss; callers do not retry.
    #[error("corrupted row: {0}")]
    Corrupt(String),

    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization round-trip failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
