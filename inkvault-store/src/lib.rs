//! Persistence layer for InkVault.
//!
//! The journal engine consumes storage through the [`JournalStore`] trait
//! and never sees a concrete backend. Two implementations are provided:
//!
//! - [`MemoryStore`] — `HashMap`-backed, for tests and ephemeral use
//! - [`SqliteStore`] — the on-disk single-file artifact (WAL mode,
//!   foreign-key cascade, bounded retry on busy)
//!
//! Both are internally synchronized; callers may share a store across
//! threads, and every read-modify-write of an entry plus its postings is
//! serialized through the store's own locking.

mod error;
mod memory;
mod records;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use records::{EntryRecord, UserRecord};
pub use sqlite::SqliteStore;

use inkvault_index::TokenHash;
use inkvault_types::{EntryId, UserId};
use std::collections::BTreeSet;

/// The persistence contract consumed by the journal engine.
///
/// A generic row store: user records, entry ciphertext bundles, and the
/// blind-index posting table. Implementations store only what they are
/// handed — ciphertext, nonces, tags, and keyed token hashes.
pub trait JournalStore: Send + Sync {
    /// Inserts a new user. Fails with [`StoreError::DuplicateUser`] if the
    /// username is taken.
    fn put_user(&self, user: &UserRecord) -> StoreResult<()>;

    /// Fetches a user by id.
    fn get_user(&self, id: UserId) -> StoreResult<Option<UserRecord>>;

    /// Fetches a user by username.
    fn get_user_by_name(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    /// Replaces a user's verification hash, KDF salt/parameters, and
    /// wrapped DEK in one step (password change).
    fn update_user_credentials(
        &self,
        id: UserId,
        password_hash: &str,
        kdf_params: &inkvault_crypto::KdfParams,
        kek_salt: &inkvault_crypto::Salt,
        wrapped_dek: &inkvault_crypto::EncryptedField,
    ) -> StoreResult<()>;

    /// Inserts or replaces an entry ciphertext bundle.
    fn put_entry(&self, entry: &EntryRecord) -> StoreResult<()>;

    /// Fetches an entry by id.
    fn get_entry(&self, id: EntryId) -> StoreResult<Option<EntryRecord>>;

    /// Deletes an entry row. Implementations also drop the entry's
    /// postings (cascade), so no orphaned tokens survive.
    fn delete_entry(&self, id: EntryId) -> StoreResult<()>;

    /// Lists all entries owned by a user, newest first.
    fn list_entries_by_owner(&self, owner: UserId) -> StoreResult<Vec<EntryRecord>>;

    /// Replaces the full posting set for an entry as one logical unit.
    /// Any previously stored tokens for the entry are removed first.
    fn put_tokens(&self, entry: EntryId, tokens: &BTreeSet<TokenHash>) -> StoreResult<()>;

    /// Removes all postings for an entry.
    fn delete_tokens(&self, entry: EntryId) -> StoreResult<()>;

    /// Returns the ids of all entries posted under a token hash.
    fn lookup_by_token(&self, token: &TokenHash) -> StoreResult<Vec<EntryId>>;
}
