//! In-memory store for tests and ephemeral sessions.

use crate::records::{EntryRecord, UserRecord};
use crate::{JournalStore, StoreError, StoreResult};
use inkvault_crypto::{EncryptedField, KdfParams, Salt};
use inkvault_index::TokenHash;
use inkvault_types::{EntryId, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, UserRecord>,
    users_by_name: HashMap<String, UserId>,
    entries: HashMap<EntryId, EntryRecord>,
    /// token hash -> entry ids (the blind index).
    postings: HashMap<TokenHash, BTreeSet<EntryId>>,
    /// entry id -> its current token set, for full replacement.
    tokens_by_entry: HashMap<EntryId, BTreeSet<TokenHash>>,
}

impl Inner {
    fn remove_postings(&mut self, entry: EntryId) {
        if let Some(tokens) = self.tokens_by_entry.remove(&entry) {
            for token in tokens {
                if let Some(ids) = self.postings.get_mut(&token) {
                    ids.remove(&entry);
                    if ids.is_empty() {
                        self.postings.remove(&token);
                    }
                }
            }
        }
    }
}

/// `HashMap`-backed [`JournalStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalStore for MemoryStore {
    fn put_user(&self, user: &UserRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.users_by_name.contains_key(&user.username) {
            return Err(StoreError::DuplicateUser(user.username.clone()));
        }
        inner.users_by_name.insert(user.username.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    fn get_user(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.users.get(&id).cloned())
    }

    fn get_user_by_name(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .users_by_name
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    fn update_user_credentials(
        &self,
        id: UserId,
        password_hash: &str,
        kdf_params: &KdfParams,
        kek_salt: &Salt,
        wrapped_dek: &EncryptedField,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if let Some(user) = inner.users.get_mut(&id) {
            user.password_hash = password_hash.to_string();
            user.kdf_params = kdf_params.clone();
            user.kek_salt = kek_salt.clone();
            user.wrapped_dek = wrapped_dek.clone();
        }
        Ok(())
    }

    fn put_entry(&self, entry: &EntryRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    fn get_entry(&self, id: EntryId) -> StoreResult<Option<EntryRecord>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.entries.get(&id).cloned())
    }

    fn delete_entry(&self, id: EntryId) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.entries.remove(&id);
        inner.remove_postings(id);
        Ok(())
    }

    fn list_entries_by_owner(&self, owner: UserId) -> StoreResult<Vec<EntryRecord>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut entries: Vec<EntryRecord> = inner
            .entries
            .values()
            .filter(|entry| entry.owner == owner)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    fn put_tokens(&self, entry: EntryId, tokens: &BTreeSet<TokenHash>) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.remove_postings(entry);
        for token in tokens {
            inner.postings.entry(*token).or_default().insert(entry);
        }
        inner.tokens_by_entry.insert(entry, tokens.clone());
        Ok(())
    }

    fn delete_tokens(&self, entry: EntryId) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.remove_postings(entry);
        Ok(())
    }

    fn lookup_by_token(&self, token: &TokenHash) -> StoreResult<Vec<EntryId>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .postings
            .get(token)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }
}
