use inkvault_crypto::{
    Dek, EncryptedField, NONCE_SIZE, TAG_SIZE, decrypt_field, decrypt_str, encrypt_field,
    encrypt_str,
};

fn key() -> Dek {
    Dek::generate()
}

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = key();
    let plaintext = b"The old mill stood by the river";
    let encrypted = encrypt_field(key.as_bytes(), plaintext, b"entry-1/body").unwrap();
    let decrypted = decrypt_field(key.as_bytes(), &encrypted, b"entry-1/body").unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn encrypt_decrypt_empty() {
    let key = key();
    let encrypted = encrypt_field(key.as_bytes(), b"", b"aad").unwrap();
    let decrypted = decrypt_field(key.as_bytes(), &encrypted, b"aad").unwrap();
    assert_eq!(decrypted, b"");
}

#[test]
fn encrypt_decrypt_non_ascii() {
    let key = key();
    let plaintext = "Дневник — 日記 🗺";
    let encrypted = encrypt_str(key.as_bytes(), plaintext, b"aad").unwrap();
    let decrypted = decrypt_str(key.as_bytes(), &encrypted, b"aad").unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn wrong_key_fails_decryption() {
    let key1 = key();
    let key2 = key();
    let encrypted = encrypt_field(key1.as_bytes(), b"secret", b"aad").unwrap();
    assert!(decrypt_field(key2.as_bytes(), &encrypted, b"aad").is_err());
}

#[test]
fn wrong_aad_fails_decryption() {
    let key = key();
    let encrypted = encrypt_field(key.as_bytes(), b"secret", b"entry-1/title").unwrap();
    assert!(decrypt_field(key.as_bytes(), &encrypted, b"entry-1/body").is_err());
    assert!(decrypt_field(key.as_bytes(), &encrypted, b"entry-2/title").is_err());
}

#[test]
fn tampered_ciphertext_fails_decryption() {
    let key = key();
    let mut encrypted = encrypt_field(key.as_bytes(), b"secret", b"aad").unwrap();
    encrypted.ciphertext[0] ^= 0xFF;
    assert!(decrypt_field(key.as_bytes(), &encrypted, b"aad").is_err());
}

#[test]
fn tampered_tag_fails_decryption() {
    let key = key();
    let mut encrypted = encrypt_field(key.as_bytes(), b"secret", b"aad").unwrap();
    // The tag is the trailing TAG_SIZE bytes of the ciphertext.
    let last = encrypted.ciphertext.len() - 1;
    encrypted.ciphertext[last] ^= 0x01;
    assert!(decrypt_field(key.as_bytes(), &encrypted, b"aad").is_err());
}

#[test]
fn tampered_nonce_fails_decryption() {
    let key = key();
    let mut encrypted = encrypt_field(key.as_bytes(), b"secret", b"aad").unwrap();
    encrypted.nonce[0] ^= 0xFF;
    assert!(decrypt_field(key.as_bytes(), &encrypted, b"aad").is_err());
}

#[test]
fn same_plaintext_produces_different_ciphertext() {
    let key = key();
    let e1 = encrypt_field(key.as_bytes(), b"same", b"aad").unwrap();
    let e2 = encrypt_field(key.as_bytes(), b"same", b"aad").unwrap();
    assert_ne!(e1.nonce, e2.nonce);
    assert_ne!(e1.ciphertext, e2.ciphertext);
}

#[test]
fn ciphertext_includes_auth_tag() {
    let key = key();
    let plaintext = b"sized";
    let encrypted = encrypt_field(key.as_bytes(), plaintext, b"aad").unwrap();
    assert_eq!(encrypted.ciphertext.len(), plaintext.len() + TAG_SIZE);
}

// ── EncryptedField ───────────────────────────────────────────────

#[test]
fn field_len_counts_nonce() {
    let key = key();
    let encrypted = encrypt_field(key.as_bytes(), b"test", b"aad").unwrap();
    assert_eq!(encrypted.len(), NONCE_SIZE + encrypted.ciphertext.len());
}

#[test]
fn base64_roundtrip() {
    let key = key();
    let encrypted = encrypt_field(key.as_bytes(), b"data", b"aad").unwrap();
    let encoded = encrypted.to_base64();
    let decoded = EncryptedField::from_base64(&encoded).unwrap();
    assert_eq!(encrypted, decoded);
    let decrypted = decrypt_field(key.as_bytes(), &decoded, b"aad").unwrap();
    assert_eq!(decrypted, b"data");
}

#[test]
fn base64_too_short_fails() {
    use base64::{Engine, engine::general_purpose::STANDARD};
    let short = STANDARD.encode([0u8; 10]);
    assert!(EncryptedField::from_base64(&short).is_err());
}

#[test]
fn base64_invalid_fails() {
    assert!(EncryptedField::from_base64("!!!not-base64!!!").is_err());
}

#[test]
fn field_serde_roundtrip() {
    let key = key();
    let encrypted = encrypt_field(key.as_bytes(), b"test", b"aad").unwrap();
    let json = serde_json::to_string(&encrypted).unwrap();
    let parsed: EncryptedField = serde_json::from_str(&json).unwrap();
    assert_eq!(encrypted, parsed);
}
