//! Account lifecycle: signup, login, password change.
//!
//! Login order is fixed: the stored verification hash is checked first,
//! and only then is the wrapped DEK unwrapped. The wrapped DEK is never
//! probed speculatively, so a wrong password surfaces as [`JournalError::Auth`]
//! without ever exercising the key-wrap boundary.

use crate::error::{JournalError, JournalResult, translate_crypto};
use crate::service::{entry_tokens, field_aad};
use chrono::Utc;
use inkvault_crypto::{
    Dek, KdfParams, Salt, SessionKeys, decrypt_str, derive_master_key, derive_search_key,
    hash_password, unwrap_dek, verify_password, wrap_dek,
};
use inkvault_store::{JournalStore, UserRecord};
use inkvault_types::UserId;
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// An unlocked journal session.
///
/// Owns the session's key material; passed explicitly into every entry
/// operation and zeroized when dropped, on any exit path.
#[derive(Debug)]
pub struct Session {
    username: String,
    keys: SessionKeys,
}

impl Session {
    /// The authenticated account id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.keys.user_id
    }

    /// The authenticated account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn keys(&self) -> &SessionKeys {
        &self.keys
    }
}

/// Associated data binding a wrapped DEK to its owning user record.
fn dek_aad(user: UserId) -> Vec<u8> {
    format!("{}/dek", user).into_bytes()
}

/// Creates a new account: verification hash, fresh DEK, and a single
/// wrapped-key write. Keys are derived once here and dropped; signup does
/// not open a session.
pub fn register(
    store: &dyn JournalStore,
    username: &str,
    password: &str,
    params: &KdfParams,
) -> JournalResult<UserId> {
    let username = username.trim();
    if username.is_empty() {
        return Err(JournalError::Validation("username must not be empty".to_string()));
    }
    if password.is_empty() {
        return Err(JournalError::Validation("password must not be empty".to_string()));
    }
    if store.get_user_by_name(username)?.is_some() {
        return Err(JournalError::Validation(format!(
            "username already registered: {}",
            username
        )));
    }

    let id = UserId::new();
    let password_hash = hash_password(password, params).map_err(translate_crypto)?;
    let kek_salt = Salt::random();
    let master = derive_master_key(password, &kek_salt, params).map_err(translate_crypto)?;
    let dek = Dek::generate();
    let wrapped_dek = wrap_dek(&master, &dek, &dek_aad(id)).map_err(translate_crypto)?;

    store.put_user(&UserRecord {
        id,
        username: username.to_string(),
        password_hash,
        kdf_params: params.clone(),
        kek_salt,
        wrapped_dek,
        created_at: Utc::now().timestamp(),
    })?;

    info!(user = %id, "registered account");
    Ok(id)
}

/// Authenticates and unlocks a session.
///
/// Runs the memory-hard KDF inline; interactive callers should prefer
/// [`login`]. The master key exists only within this call and is zeroized
/// on return.
pub fn login_blocking(
    store: &dyn JournalStore,
    username: &str,
    password: &str,
) -> JournalResult<Session> {
    let username = username.trim();
    let user = store
        .get_user_by_name(username)?
        .ok_or_else(|| JournalError::UserNotFound(username.to_string()))?;

    // Verification gates the unwrap; a mismatch returns before any key
    // material is derived.
    if !verify_password(&user.password_hash, password).map_err(translate_crypto)? {
        debug!(user = %user.id, "password verification failed");
        return Err(JournalError::Auth);
    }

    let master =
        derive_master_key(password, &user.kek_salt, &user.kdf_params).map_err(translate_crypto)?;
    let dek = unwrap_dek(&master, &user.wrapped_dek, &dek_aad(user.id))
        .map_err(|_| JournalError::Integrity { user: user.id })?;
    let search_key = derive_search_key(&master).map_err(translate_crypto)?;

    debug!(user = %user.id, "session unlocked");
    Ok(Session {
        username: user.username,
        keys: SessionKeys {
            user_id: user.id,
            dek,
            search_key,
        },
    })
}

/// Async [`login_blocking`]: runs the KDF on the blocking pool so the
/// interactive path stays responsive.
///
/// A caller that abandons the returned future leaves the derivation to
/// finish in the background; its keys are then dropped — and therefore
/// zeroized — without ever becoming observable.
pub async fn login(
    store: Arc<dyn JournalStore>,
    username: String,
    password: String,
) -> JournalResult<Session> {
    let password = Zeroizing::new(password);
    tokio::task::spawn_blocking(move || login_blocking(store.as_ref(), &username, &password))
        .await
        .map_err(|e| JournalError::Crypto(format!("login task failed: {}", e)))?
}

/// Changes the account password.
///
/// The DEK is unchanged — only its wrapping rotates — so entry fields are
/// not re-encrypted. The search key, however, derives from the master key
/// and rotates with it, so every entry's posting set is rebuilt under the
/// new key. Returns a fresh session; the old one should be dropped.
pub fn change_password(
    store: &dyn JournalStore,
    session: &Session,
    current: &str,
    new: &str,
) -> JournalResult<Session> {
    if new.is_empty() {
        return Err(JournalError::Validation("new password must not be empty".to_string()));
    }

    let user = store
        .get_user(session.user_id())?
        .ok_or_else(|| JournalError::UserNotFound(session.username.clone()))?;

    if !verify_password(&user.password_hash, current).map_err(translate_crypto)? {
        return Err(JournalError::Auth);
    }

    let params = user.kdf_params.clone();
    let new_hash = hash_password(new, &params).map_err(translate_crypto)?;
    let new_salt = Salt::random();
    let new_master = derive_master_key(new, &new_salt, &params).map_err(translate_crypto)?;
    let wrapped_dek =
        wrap_dek(&new_master, &session.keys.dek, &dek_aad(user.id)).map_err(translate_crypto)?;

    store.update_user_credentials(user.id, &new_hash, &params, &new_salt, &wrapped_dek)?;

    let new_search = derive_search_key(&new_master).map_err(translate_crypto)?;
    let dek = session.keys.dek.as_bytes();
    let mut reindexed = 0usize;
    for entry in store.list_entries_by_owner(user.id)? {
        let title = decrypt_str(dek, &entry.title, &field_aad(entry.id, "title"))
            .map_err(|_| JournalError::Decryption {
                entry: entry.id,
                field: "title",
            })?;
        let body = decrypt_str(dek, &entry.body, &field_aad(entry.id, "body")).map_err(|_| {
            JournalError::Decryption {
                entry: entry.id,
                field: "body",
            }
        })?;
        store.put_tokens(entry.id, &entry_tokens(&new_search, &title, &body))?;
        reindexed += 1;
    }

    info!(user = %user.id, entries = reindexed, "password changed, blind index rebuilt");
    Ok(Session {
        username: user.username,
        keys: SessionKeys {
            user_id: user.id,
            dek: session.keys.dek.clone(),
            search_key: new_search,
        },
    })
}
