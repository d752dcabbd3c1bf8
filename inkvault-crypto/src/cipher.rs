//! Field encryption using ChaCha20-Poly1305.
//!
//! Provides authenticated encryption with associated data (AEAD). Every
//! persisted field (entry title, body, map, wrapped DEK) goes through this
//! module. The associated data binds the ciphertext to its context — field
//! name and entry id — so an attacker cannot swap ciphertexts between
//! fields or entries without failing authentication.

use crate::error::{CryptoError, CryptoResult};
use crate::key::KEY_SIZE;
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// An encrypted field with the metadata needed for decryption.
///
/// The Poly1305 authentication tag is the trailing [`TAG_SIZE`] bytes of
/// `ciphertext`. The associated data is not stored; the caller supplies it
/// again at decryption time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    /// The nonce used for encryption (unique per encryption).
    pub nonce: [u8; NONCE_SIZE],
    /// The encrypted ciphertext (includes auth tag).
    pub ciphertext: Vec<u8>,
}

impl EncryptedField {
    /// Returns the total size of the encrypted field.
    pub fn len(&self) -> usize {
        NONCE_SIZE + self.ciphertext.len()
    }

    /// Returns true if the ciphertext is empty.
    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Encodes to base64 for export/backup.
    pub fn to_base64(&self) -> String {
        use base64::{Engine, engine::general_purpose::STANDARD};
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        STANDARD.encode(&bytes)
    }

    /// Decodes from base64.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        use base64::{Engine, engine::general_purpose::STANDARD};
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::Decryption(format!("invalid base64: {}", e)))?;

        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::Decryption("data too short".to_string()));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[..NONCE_SIZE]);
        let ciphertext = bytes[NONCE_SIZE..].to_vec();

        Ok(Self { nonce, ciphertext })
    }
}

/// Encrypts a field using ChaCha20-Poly1305.
///
/// A fresh random nonce is generated per call; the same (key, nonce) pair
/// is never reused. `aad` is authenticated but not encrypted.
pub fn encrypt_field(
    key: &[u8; KEY_SIZE],
    plaintext: &[u8],
    aad: &[u8],
) -> CryptoResult<EncryptedField> {
    let cipher = ChaCha20Poly1305::new(key.into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(EncryptedField {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypts a field using ChaCha20-Poly1305.
///
/// Fails closed: any mismatch in key, nonce, ciphertext, tag, or associated
/// data yields [`CryptoError::Decryption`] and no plaintext, partial or
/// otherwise, is returned.
pub fn decrypt_field(
    key: &[u8; KEY_SIZE],
    encrypted: &EncryptedField,
    aad: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.into());
    let nonce = Nonce::from_slice(&encrypted.nonce);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: encrypted.ciphertext.as_ref(),
                aad,
            },
        )
        .map_err(|_| {
            CryptoError::Decryption(
                "authentication failed (wrong key, wrong context, or tampered data)".to_string(),
            )
        })
}

/// Encrypts a UTF-8 string field.
pub fn encrypt_str(key: &[u8; KEY_SIZE], plaintext: &str, aad: &[u8]) -> CryptoResult<EncryptedField> {
    encrypt_field(key, plaintext.as_bytes(), aad)
}

/// Decrypts a field and interprets the plaintext as UTF-8.
pub fn decrypt_str(
    key: &[u8; KEY_SIZE],
    encrypted: &EncryptedField,
    aad: &[u8],
) -> CryptoResult<String> {
    let plaintext = decrypt_field(key, encrypted, aad)?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {}", e)))
}
