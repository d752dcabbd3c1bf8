//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// KDF or cipher parameters are out of range.
    #[error("invalid crypto parameters: {0}")]
    InvalidParams(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key, wrong associated data, or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Key unwrap failed authentication (wrong key material or tampered storage).
    #[error("key unwrap failed: {0}")]
    Integrity(String),

    /// A stored password hash could not be parsed or produced.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
