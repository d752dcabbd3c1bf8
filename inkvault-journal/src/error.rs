//! Caller-facing error taxonomy.
//!
//! Low-level crypto and store errors are translated here, annotated with
//! entry/field context where it exists. Messages never carry plaintext or
//! ciphertext.

use inkvault_crypto::CryptoError;
use inkvault_store::StoreError;
use inkvault_types::{EntryId, UserId};
use thiserror::Error;

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Password verification failed.
    #[error("invalid credentials")]
    Auth,

    /// The wrapped DEK failed authentication: tampered storage, or key
    /// material that no longer matches the verified password.
    #[error("key unwrap failed for user {user}")]
    Integrity { user: UserId },

    /// A field ciphertext failed authentication. Treated as unrecoverable;
    /// no partial plaintext is ever surfaced.
    #[error("decryption failed for entry {entry}, field {field}")]
    Decryption { entry: EntryId, field: &'static str },

    /// Malformed input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The entry exists but belongs to another user.
    #[error("entry {entry} is not accessible to user {user}")]
    Access { entry: EntryId, user: UserId },

    /// No such user.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No such entry.
    #[error("entry not found: {0}")]
    EntryNotFound(EntryId),

    /// KDF or cipher parameters were rejected.
    #[error("invalid crypto configuration: {0}")]
    CryptoConfig(String),

    /// Other cryptographic failure (derivation, encryption).
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Persistence failure.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Maps crypto-layer errors that carry no entry/field context.
pub(crate) fn translate_crypto(err: CryptoError) -> JournalError {
    match err {
        CryptoError::InvalidParams(msg) => JournalError::CryptoConfig(msg),
        other => JournalError::Crypto(other.to_string()),
    }
}
