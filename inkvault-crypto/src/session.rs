//! Session-scoped key material.

use crate::key::{Dek, SearchKey};
use inkvault_types::UserId;

/// Keys unlocked for an authenticated session.
///
/// Deliberately not a process-wide value: the caller owns the session and
/// passes it into every entry operation explicitly. The contained key
/// material zeroizes when the session is dropped, on any exit path.
pub struct SessionKeys {
    /// The account these keys belong to.
    pub user_id: UserId,
    /// Unwrapped data encryption key.
    pub dek: Dek,
    /// Derived blind-index search key.
    pub search_key: SearchKey,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("user_id", &self.user_id)
            .field("dek", &"[REDACTED]")
            .field("search_key", &"[REDACTED]")
            .finish()
    }
}
