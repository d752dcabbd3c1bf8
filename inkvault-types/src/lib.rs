//! Core type definitions for InkVault.
//!
//! This crate defines the fundamental, layer-agnostic types used throughout
//! the journal engine:
//! - User and Entry identifiers (UUID v7)
//!
//! All domain-specific types (encrypted fields, token hashes, map grids)
//! belong to their respective crates, not here.

mod ids;

pub use ids::{EntryId, UserId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
