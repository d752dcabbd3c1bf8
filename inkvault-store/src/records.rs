//! Persisted record types.
//!
//! Everything in these records is either public metadata (ids, timestamps,
//! KDF parameters) or sits behind an authenticated-encryption boundary
//! (wrapped DEK, field ciphertexts) or a keyed one-way hash (password
//! hash, token hashes). A copy of the backing file leaks nothing
//! recoverable without the password.

use inkvault_crypto::{EncryptedField, KdfParams, Salt};
use inkvault_types::{EntryId, UserId};
use serde::{Deserialize, Serialize};

/// A journal account row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    /// Argon2id PHC verification hash; carries its own salt.
    pub password_hash: String,
    /// Parameters used to derive the master key.
    pub kdf_params: KdfParams,
    /// Salt for master-key derivation (distinct from the hash salt).
    pub kek_salt: Salt,
    /// The DEK, AEAD-encrypted under the master key.
    pub wrapped_dek: EncryptedField,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}

/// An encrypted journal entry row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub owner: UserId,
    pub title: EncryptedField,
    pub body: EncryptedField,
    pub map: EncryptedField,
    /// Unix timestamp (seconds).
    pub created_at: i64,
    /// Unix timestamp (seconds); equals `created_at` until the first edit.
    pub modified_at: i64,
}
