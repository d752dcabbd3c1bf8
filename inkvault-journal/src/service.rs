//! Entry operations over an unlocked session.
//!
//! The service orchestrates the map generator, cipher, and blind indexer
//! around the persistence collaborator. It holds no key material itself;
//! every operation borrows the caller's [`Session`].

use crate::account::Session;
use crate::error::{JournalError, JournalResult, translate_crypto};
use chrono::Utc;
use inkvault_crypto::{EncryptedField, KEY_SIZE, SearchKey, decrypt_str, encrypt_str};
use inkvault_index::{TokenHash, index_tokens, match_query};
use inkvault_map::MapConfig;
use inkvault_store::{EntryRecord, JournalStore};
use inkvault_types::EntryId;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Associated data binding a field ciphertext to its entry and field.
pub(crate) fn field_aad(entry: EntryId, field: &'static str) -> Vec<u8> {
    format!("{}/{}", entry, field).into_bytes()
}

/// The deduplicated token set for an entry's searchable text.
pub(crate) fn entry_tokens(key: &SearchKey, title: &str, body: &str) -> BTreeSet<TokenHash> {
    let mut tokens = index_tokens(key, title);
    tokens.extend(index_tokens(key, body));
    tokens
}

fn open_field(
    dek: &[u8; KEY_SIZE],
    id: EntryId,
    field: &'static str,
    encrypted: &EncryptedField,
) -> JournalResult<String> {
    decrypt_str(dek, encrypted, &field_aad(id, field))
        .map_err(|_| JournalError::Decryption { entry: id, field })
}

fn validate_text(field: &str, value: &str) -> JournalResult<()> {
    if value.trim().is_empty() {
        Err(JournalError::Validation(format!(
            "{} must not be empty",
            field
        )))
    } else {
        Ok(())
    }
}

/// A fully decrypted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedEntry {
    pub title: String,
    pub body: String,
    /// Rendered map text, regenerated from the body on every save.
    pub map: String,
    pub created_at: i64,
    pub modified_at: i64,
}

/// Title-only projection for listings and search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub id: EntryId,
    pub title: String,
    pub created_at: i64,
}

/// Orchestrates entry CRUD and search against the persistence collaborator.
pub struct EntryService {
    store: Arc<dyn JournalStore>,
    map_config: MapConfig,
}

impl EntryService {
    /// Creates a service with default map parameters.
    pub fn new(store: Arc<dyn JournalStore>) -> Self {
        Self {
            store,
            map_config: MapConfig::default(),
        }
    }

    /// Creates a service with explicit map parameters.
    pub fn with_map_config(
        store: Arc<dyn JournalStore>,
        map_config: MapConfig,
    ) -> JournalResult<Self> {
        map_config
            .validate()
            .map_err(|e| JournalError::Validation(e.to_string()))?;
        Ok(Self { store, map_config })
    }

    /// Encrypts and stores a new entry: map generation, per-field AEAD
    /// with field-scoped associated data, token computation, and a single
    /// entry-plus-postings write.
    pub fn create_entry(
        &self,
        session: &Session,
        title: &str,
        body: &str,
    ) -> JournalResult<EntryId> {
        validate_text("title", title)?;
        validate_text("body", body)?;

        let id = EntryId::new();
        let map = inkvault_map::map_text(body, &self.map_config)
            .map_err(|e| JournalError::Validation(e.to_string()))?;

        let keys = session.keys();
        let dek = keys.dek.as_bytes();
        let now = Utc::now().timestamp();
        let record = EntryRecord {
            id,
            owner: keys.user_id,
            title: encrypt_str(dek, title, &field_aad(id, "title")).map_err(translate_crypto)?,
            body: encrypt_str(dek, body, &field_aad(id, "body")).map_err(translate_crypto)?,
            map: encrypt_str(dek, &map, &field_aad(id, "map")).map_err(translate_crypto)?,
            created_at: now,
            modified_at: now,
        };
        let tokens = entry_tokens(&keys.search_key, title, body);

        self.store.put_entry(&record)?;
        self.store.put_tokens(id, &tokens)?;
        debug!(entry = %id, tokens = tokens.len(), "created entry");
        Ok(id)
    }

    /// Fetches and decrypts an entry the session owns.
    pub fn read_entry(&self, session: &Session, id: EntryId) -> JournalResult<DecryptedEntry> {
        let entry = self.fetch_owned(session, id)?;
        let dek = session.keys().dek.as_bytes();
        Ok(DecryptedEntry {
            title: open_field(dek, id, "title", &entry.title)?,
            body: open_field(dek, id, "body", &entry.body)?,
            map: open_field(dek, id, "map", &entry.map)?,
            created_at: entry.created_at,
            modified_at: entry.modified_at,
        })
    }

    /// Lists the session's entries as title projections, newest first.
    pub fn list_entries(&self, session: &Session) -> JournalResult<Vec<EntryHeader>> {
        let dek = session.keys().dek.as_bytes();
        let mut headers = Vec::new();
        for entry in self.store.list_entries_by_owner(session.user_id())? {
            headers.push(EntryHeader {
                id: entry.id,
                title: open_field(dek, entry.id, "title", &entry.title)?,
                created_at: entry.created_at,
            });
        }
        Ok(headers)
    }

    /// Finds entries containing every queried term (conjunctive matching),
    /// newest first. An empty or all-stop-word query matches nothing.
    pub fn search(&self, session: &Session, query: &str) -> JournalResult<Vec<EntryHeader>> {
        let tokens = match_query(&session.keys().search_key, query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Option<BTreeSet<EntryId>> = None;
        for token in &tokens {
            let ids: BTreeSet<EntryId> = self.store.lookup_by_token(token)?.into_iter().collect();
            let narrowed = match matches {
                Some(acc) => acc.intersection(&ids).copied().collect(),
                None => ids,
            };
            if narrowed.is_empty() {
                return Ok(Vec::new());
            }
            matches = Some(narrowed);
        }

        let dek = session.keys().dek.as_bytes();
        let mut headers = Vec::new();
        for id in matches.unwrap_or_default() {
            let Some(entry) = self.store.get_entry(id)? else {
                continue;
            };
            if entry.owner != session.user_id() {
                continue;
            }
            headers.push(EntryHeader {
                id,
                title: open_field(dek, id, "title", &entry.title)?,
                created_at: entry.created_at,
            });
        }
        headers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        debug!(terms = tokens.len(), matches = headers.len(), "search complete");
        Ok(headers)
    }

    /// Re-encrypts an entry with new content: fresh nonces for every
    /// field, a regenerated map, and full posting-set replacement so no
    /// stale tokens survive.
    pub fn update_entry(
        &self,
        session: &Session,
        id: EntryId,
        new_title: &str,
        new_body: &str,
    ) -> JournalResult<()> {
        validate_text("title", new_title)?;
        validate_text("body", new_body)?;

        let existing = self.fetch_owned(session, id)?;
        let map = inkvault_map::map_text(new_body, &self.map_config)
            .map_err(|e| JournalError::Validation(e.to_string()))?;

        let keys = session.keys();
        let dek = keys.dek.as_bytes();
        let record = EntryRecord {
            id,
            owner: existing.owner,
            title: encrypt_str(dek, new_title, &field_aad(id, "title"))
                .map_err(translate_crypto)?,
            body: encrypt_str(dek, new_body, &field_aad(id, "body")).map_err(translate_crypto)?,
            map: encrypt_str(dek, &map, &field_aad(id, "map")).map_err(translate_crypto)?,
            created_at: existing.created_at,
            modified_at: Utc::now().timestamp(),
        };
        let tokens = entry_tokens(&keys.search_key, new_title, new_body);

        self.store.put_entry(&record)?;
        self.store.put_tokens(id, &tokens)?;
        debug!(entry = %id, "updated entry");
        Ok(())
    }

    /// Removes an entry and all of its postings together.
    pub fn delete_entry(&self, session: &Session, id: EntryId) -> JournalResult<()> {
        self.fetch_owned(session, id)?;
        self.store.delete_tokens(id)?;
        self.store.delete_entry(id)?;
        debug!(entry = %id, "deleted entry");
        Ok(())
    }

    fn fetch_owned(&self, session: &Session, id: EntryId) -> JournalResult<EntryRecord> {
        let entry = self
            .store
            .get_entry(id)?
            .ok_or(JournalError::EntryNotFound(id))?;
        if entry.owner != session.user_id() {
            return Err(JournalError::Access {
                entry: id,
                user: session.user_id(),
            });
        }
        Ok(entry)
    }
}
