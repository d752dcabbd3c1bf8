//! Journal engine for InkVault.
//!
//! Composes the crypto, index, map, and store layers into the public API
//! consumed by the presentation layer:
//! - [`register`] / [`login`] / [`change_password`] — account lifecycle
//! - [`Session`] — an unlocked session's key material, explicitly scoped
//! - [`EntryService`] — create/read/update/delete/search over entries
//!
//! All side effects go through the [`inkvault_store::JournalStore`]
//! collaborator; the presentation layer receives plaintext results or
//! typed [`JournalError`]s and owns everything visual.

mod account;
mod error;
mod service;

pub use account::{Session, change_password, login, login_blocking, register};
pub use error::{JournalError, JournalResult};
pub use service::{DecryptedEntry, EntryHeader, EntryService};
