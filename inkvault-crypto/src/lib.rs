//! Encryption layer for InkVault.
//!
//! Stateless cryptographic building blocks plus the session key container:
//! - [`encrypt_field`] / [`decrypt_field`] — authenticated field encryption
//!   (ChaCha20-Poly1305 + AAD)
//! - [`derive_master_key`] / [`wrap_dek`] / [`derive_search_key`] — Argon2id
//!   derivation, password hashes, DEK wrapping, HKDF search-key derivation
//! - [`SessionKeys`] — zeroizing container for a session's unlocked keys
//!
//! This crate performs no I/O; persistence and orchestration live above it.

mod cipher;
mod error;
mod key;
mod session;

pub use cipher::{
    EncryptedField, NONCE_SIZE, TAG_SIZE, decrypt_field, decrypt_str, encrypt_field, encrypt_str,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    Dek, KEY_SIZE, KdfParams, MasterKey, SALT_SIZE, Salt, SearchKey, derive_master_key,
    derive_search_key, hash_password, unwrap_dek, verify_password, wrap_dek,
};
pub use session::SessionKeys;
