//! SQLite backend — the single-file on-disk artifact.
//!
//! Schema follows the row-store contract: a `users` table with the wrapped
//! DEK and KDF parameters, an `entries` table of per-field ciphertext, and
//! an `entry_tokens` posting table for the blind index. Postings cascade
//! away with their entry. The file holds only ciphertext, nonces, tags,
//! and keyed token hashes, so copying it elsewhere needs no extra care.

use crate::records::{EntryRecord, UserRecord};
use crate::{JournalStore, StoreError, StoreResult};
use inkvault_crypto::{EncryptedField, KdfParams, NONCE_SIZE, SALT_SIZE, Salt};
use inkvault_index::TokenHash;
use inkvault_types::{EntryId, UserId};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const SCHEMA: &str = "
PRAGMA journal_mode=WAL;
PRAGMA foreign_keys=ON;

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    username      TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    kdf_params    TEXT NOT NULL,
    kek_salt      BLOB NOT NULL,
    dek_nonce     BLOB NOT NULL,
    dek_ct        BLOB NOT NULL,
    created_at    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS entries (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title_nonce BLOB NOT NULL,
    title_ct    BLOB NOT NULL,
    body_nonce  BLOB NOT NULL,
    body_ct     BLOB NOT NULL,
    map_nonce   BLOB NOT NULL,
    map_ct      BLOB NOT NULL,
    created_at  INTEGER NOT NULL,
    modified_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS entry_tokens (
    entry_id   TEXT NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    token_hash BLOB NOT NULL,
    UNIQUE(entry_id, token_hash)
);

CREATE INDEX IF NOT EXISTS idx_tokens_hash ON entry_tokens(token_hash);
CREATE INDEX IF NOT EXISTS idx_entries_owner ON entries(owner_id);
";

/// How many times a busy database is retried before the error surfaces.
const MAX_BUSY_RETRIES: u32 = 3;

/// SQLite-backed [`JournalStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) the journal database at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened journal database");
        Self::init(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs `op`, retrying a bounded number of times when another process
    /// holds the database lock. Any other error surfaces immediately.
    fn with_conn<T>(&self, op: impl Fn(&mut Connection) -> StoreResult<T>) -> StoreResult<T> {
        let mut conn = self.conn.lock().expect("store mutex poisoned");
        let mut attempt = 0;
        loop {
            match op(&mut conn) {
                Err(StoreError::Database(err)) if is_busy(&err) && attempt < MAX_BUSY_RETRIES => {
                    attempt += 1;
                    debug!(attempt, "database busy, retrying");
                    std::thread::sleep(Duration::from_millis(50 * u64::from(attempt)));
                }
                other => return other,
            }
        }
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn parse_user_id(s: &str) -> StoreResult<UserId> {
    UserId::parse(s).map_err(|e| StoreError::Corrupt(format!("bad user id: {}", e)))
}

fn parse_entry_id(s: &str) -> StoreResult<EntryId> {
    EntryId::parse(s).map_err(|e| StoreError::Corrupt(format!("bad entry id: {}", e)))
}

fn salt_from_blob(bytes: Vec<u8>) -> StoreResult<Salt> {
    let arr: [u8; SALT_SIZE] = bytes
        .try_into()
        .map_err(|_| StoreError::Corrupt("salt has wrong length".to_string()))?;
    Ok(Salt::from_bytes(arr))
}

fn field_from_blobs(nonce: Vec<u8>, ciphertext: Vec<u8>) -> StoreResult<EncryptedField> {
    let nonce: [u8; NONCE_SIZE] = nonce
        .try_into()
        .map_err(|_| StoreError::Corrupt("nonce has wrong length".to_string()))?;
    Ok(EncryptedField { nonce, ciphertext })
}

/// Raw column tuple for a user row, decoded into a record afterwards so
/// corruption maps to [`StoreError::Corrupt`] instead of a SQLite error.
type UserRow = (String, String, String, String, Vec<u8>, Vec<u8>, Vec<u8>, i64);

fn user_from_row(row: UserRow) -> StoreResult<UserRecord> {
    let (id, username, password_hash, kdf_json, kek_salt, dek_nonce, dek_ct, created_at) = row;
    Ok(UserRecord {
        id: parse_user_id(&id)?,
        username,
        password_hash,
        kdf_params: serde_json::from_str::<KdfParams>(&kdf_json)
            .map_err(|e| StoreError::Corrupt(format!("bad KDF params: {}", e)))?,
        kek_salt: salt_from_blob(kek_salt)?,
        wrapped_dek: field_from_blobs(dek_nonce, dek_ct)?,
        created_at,
    })
}

type EntryRow = (
    String,
    String,
    Vec<u8>,
    Vec<u8>,
    Vec<u8>,
    Vec<u8>,
    Vec<u8>,
    Vec<u8>,
    i64,
    i64,
);

fn entry_from_row(row: EntryRow) -> StoreResult<EntryRecord> {
    let (id, owner, t_nonce, t_ct, b_nonce, b_ct, m_nonce, m_ct, created_at, modified_at) = row;
    Ok(EntryRecord {
        id: parse_entry_id(&id)?,
        owner: parse_user_id(&owner)?,
        title: field_from_blobs(t_nonce, t_ct)?,
        body: field_from_blobs(b_nonce, b_ct)?,
        map: field_from_blobs(m_nonce, m_ct)?,
        created_at,
        modified_at,
    })
}

const USER_COLUMNS: &str =
    "id, username, password_hash, kdf_params, kek_salt, dek_nonce, dek_ct, created_at";

const ENTRY_COLUMNS: &str = "id, owner_id, title_nonce, title_ct, body_nonce, body_ct, \
     map_nonce, map_ct, created_at, modified_at";

impl JournalStore for SqliteStore {
    fn put_user(&self, user: &UserRecord) -> StoreResult<()> {
        self.with_conn(|conn| {
            let kdf_json = serde_json::to_string(&user.kdf_params)?;
            let result = conn.execute(
                "INSERT INTO users (id, username, password_hash, kdf_params, kek_salt, \
                 dek_nonce, dek_ct, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    user.id.to_string(),
                    user.username,
                    user.password_hash,
                    kdf_json,
                    user.kek_salt.as_bytes().as_slice(),
                    user.wrapped_dek.nonce.as_slice(),
                    user.wrapped_dek.ciphertext,
                    user.created_at,
                ],
            );
            match result {
                Ok(_) => Ok(()),
                Err(err) if is_unique_violation(&err) => {
                    Err(StoreError::DuplicateUser(user.username.clone()))
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    fn get_user(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        self.with_conn(|conn| {
            let row: Option<UserRow> = conn
                .query_row(
                    &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                    params![id.to_string()],
                    |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                            row.get(7)?,
                        ))
                    },
                )
                .optional()?;
            row.map(user_from_row).transpose()
        })
    }

    fn get_user_by_name(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        self.with_conn(|conn| {
            let row: Option<UserRow> = conn
                .query_row(
                    &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
                    params![username],
                    |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                            row.get(7)?,
                        ))
                    },
                )
                .optional()?;
            row.map(user_from_row).transpose()
        })
    }

    fn update_user_credentials(
        &self,
        id: UserId,
        password_hash: &str,
        kdf_params: &KdfParams,
        kek_salt: &Salt,
        wrapped_dek: &EncryptedField,
    ) -> StoreResult<()> {
        self.with_conn(|conn| {
            let kdf_json = serde_json::to_string(kdf_params)?;
            conn.execute(
                "UPDATE users SET password_hash = ?1, kdf_params = ?2, kek_salt = ?3, \
                 dek_nonce = ?4, dek_ct = ?5 WHERE id = ?6",
                params![
                    password_hash,
                    kdf_json,
                    kek_salt.as_bytes().as_slice(),
                    wrapped_dek.nonce.as_slice(),
                    wrapped_dek.ciphertext,
                    id.to_string(),
                ],
            )?;
            Ok(())
        })
    }

    fn put_entry(&self, entry: &EntryRecord) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO entries (id, owner_id, title_nonce, title_ct, body_nonce, \
                 body_ct, map_nonce, map_ct, created_at, modified_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
                 ON CONFLICT(id) DO UPDATE SET \
                 title_nonce = excluded.title_nonce, title_ct = excluded.title_ct, \
                 body_nonce = excluded.body_nonce, body_ct = excluded.body_ct, \
                 map_nonce = excluded.map_nonce, map_ct = excluded.map_ct, \
                 modified_at = excluded.modified_at",
                params![
                    entry.id.to_string(),
                    entry.owner.to_string(),
                    entry.title.nonce.as_slice(),
                    entry.title.ciphertext,
                    entry.body.nonce.as_slice(),
                    entry.body.ciphertext,
                    entry.map.nonce.as_slice(),
                    entry.map.ciphertext,
                    entry.created_at,
                    entry.modified_at,
                ],
            )?;
            Ok(())
        })
    }

    fn get_entry(&self, id: EntryId) -> StoreResult<Option<EntryRecord>> {
        self.with_conn(|conn| {
            let row: Option<EntryRow> = conn
                .query_row(
                    &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
                    params![id.to_string()],
                    |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                            row.get(7)?,
                            row.get(8)?,
                            row.get(9)?,
                        ))
                    },
                )
                .optional()?;
            row.map(entry_from_row).transpose()
        })
    }

    fn delete_entry(&self, id: EntryId) -> StoreResult<()> {
        self.with_conn(|conn| {
            // Postings cascade via the entry_tokens foreign key.
            conn.execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])?;
            Ok(())
        })
    }

    fn list_entries_by_owner(&self, owner: UserId) -> StoreResult<Vec<EntryRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM entries WHERE owner_id = ?1 \
                 ORDER BY created_at DESC, id DESC",
                ENTRY_COLUMNS
            ))?;
            let rows = stmt.query_map(params![owner.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(entry_from_row(row?)?);
            }
            Ok(entries)
        })
    }

    fn put_tokens(&self, entry: EntryId, tokens: &BTreeSet<TokenHash>) -> StoreResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM entry_tokens WHERE entry_id = ?1",
                params![entry.to_string()],
            )?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO entry_tokens (entry_id, token_hash) VALUES (?1, ?2)",
                )?;
                for token in tokens {
                    stmt.execute(params![entry.to_string(), token.as_bytes().as_slice()])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn delete_tokens(&self, entry: EntryId) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM entry_tokens WHERE entry_id = ?1",
                params![entry.to_string()],
            )?;
            Ok(())
        })
    }

    fn lookup_by_token(&self, token: &TokenHash) -> StoreResult<Vec<EntryId>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT entry_id FROM entry_tokens WHERE token_hash = ?1")?;
            let rows = stmt.query_map(params![token.as_bytes().as_slice()], |row| {
                row.get::<_, String>(0)
            })?;

            let mut ids = Vec::new();
            for row in rows {
                ids.push(parse_entry_id(&row?)?);
            }
            Ok(ids)
        })
    }
}
