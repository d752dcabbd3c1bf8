//! Key derivation and management.
//!
//! Implements the two-key architecture of the journal:
//!
//! 1. Master key: derived from the user's password with Argon2id. Exists
//!    only transiently during login and password changes.
//! 2. DEK (data encryption key): random 256-bit key generated once at
//!    signup, stored only wrapped (AEAD-encrypted) under the master key.
//!
//! The blind-index search key is derived from the master key with a
//! domain-separated HKDF step, so encryption and search keys are
//! cryptographically independent even though both trace to the password.
//!
//! Password *verification* uses a separate Argon2id PHC hash with its own
//! salt. Verification must succeed before any unwrap attempt is made; the
//! wrapped DEK is never probed speculatively.

use crate::cipher::{self, EncryptedField};
use crate::error::{CryptoError, CryptoResult};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, Params, Version};
use hkdf::Hkdf;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of symmetric keys in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of KDF salts in bytes.
pub const SALT_SIZE: usize = 16;

/// HKDF domain-separation string for the blind-index search key.
const SEARCH_KEY_INFO: &[u8] = b"inkvault/search-key";

/// The password-derived master key. Wraps and unwraps the DEK and seeds
/// the search key; never persisted, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_SIZE],
}

impl MasterKey {
    /// Creates a master key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The data encryption key. Encrypts every entry field; stored only in
/// wrapped form. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Dek {
    bytes: [u8; KEY_SIZE],
}

impl Dek {
    /// Generates a fresh random DEK.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a DEK from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for Dek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dek").field("bytes", &"[REDACTED]").finish()
    }
}

/// The blind-index search key. Keys the HMAC that turns normalized words
/// into index tokens. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SearchKey {
    bytes: [u8; KEY_SIZE],
}

impl SearchKey {
    /// Creates a search key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SearchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Salt for key derivation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }
}

/// Key derivation parameters.
///
/// Default values are tuned for a balance of security and performance
/// on modern hardware.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // OWASP recommendations for Argon2id (2023)
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Creates parameters for testing (fast but insecure).
    pub fn insecure_fast() -> Self {
        Self {
            memory_cost: 1024, // 1 MiB
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn to_argon2(&self) -> CryptoResult<Params> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CryptoError::InvalidParams(e.to_string()))
    }
}

fn argon2_instance(params: &KdfParams) -> CryptoResult<Argon2<'static>> {
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        Version::V0x13,
        params.to_argon2()?,
    ))
}

/// Derives the master key from a password using Argon2id.
///
/// Deterministic in (password, salt, params). Intentionally slow and
/// memory-hard; callers should run it off the interactive path.
pub fn derive_master_key(
    password: &str,
    salt: &Salt,
    params: &KdfParams,
) -> CryptoResult<MasterKey> {
    let argon2 = argon2_instance(params)?;

    let mut key_bytes = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut key_bytes)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    Ok(MasterKey::from_bytes(key_bytes))
}

/// Produces a PHC-format Argon2id verification hash for a password.
///
/// The hash carries its own random salt and is safe to persist; it is
/// used only for verification and never as key material.
pub fn hash_password(password: &str, params: &KdfParams) -> CryptoResult<String> {
    let argon2 = argon2_instance(params)?;
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CryptoError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash itself
/// is malformed.
pub fn verify_password(stored_hash: &str, password: &str) -> CryptoResult<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| CryptoError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Wraps the DEK under the master key.
///
/// `aad` binds the wrap to its owner (the user id), so a wrapped DEK
/// cannot be transplanted between user records undetected.
pub fn wrap_dek(master: &MasterKey, dek: &Dek, aad: &[u8]) -> CryptoResult<EncryptedField> {
    cipher::encrypt_field(master.as_bytes(), dek.as_bytes(), aad)
}

/// Unwraps the DEK using the master key.
///
/// Fails with [`CryptoError::Integrity`] on tag mismatch — wrong key
/// material or tampered storage. Callers must have verified the password
/// hash before attempting an unwrap.
pub fn unwrap_dek(master: &MasterKey, wrapped: &EncryptedField, aad: &[u8]) -> CryptoResult<Dek> {
    let mut plaintext = cipher::decrypt_field(master.as_bytes(), wrapped, aad)
        .map_err(|_| CryptoError::Integrity("wrapped key failed authentication".to_string()))?;

    if plaintext.len() != KEY_SIZE {
        plaintext.zeroize();
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: plaintext.len(),
        });
    }

    let mut key_bytes = [0u8; KEY_SIZE];
    key_bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();

    Ok(Dek::from_bytes(key_bytes))
}

/// Derives the blind-index search key from the master key.
///
/// HKDF-SHA256 with a fixed domain-separation info string; stable per
/// user for as long as the password is unchanged.
pub fn derive_search_key(master: &MasterKey) -> CryptoResult<SearchKey> {
    let hkdf = Hkdf::<Sha256>::new(None, master.as_bytes());
    let mut okm = [0u8; KEY_SIZE];
    hkdf.expand(SEARCH_KEY_INFO, &mut okm)
        .map_err(|e| CryptoError::KeyDerivation(format!("HKDF expand failed: {}", e)))?;
    Ok(SearchKey::from_bytes(okm))
}
