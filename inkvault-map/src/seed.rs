//! Seed derivation from entry text.

use sha2::{Digest, Sha256};

/// Derives the map seed from entry body text.
///
/// SHA-256 of the UTF-8 bytes, truncated to the first 8 bytes (big
/// endian). Identical text always yields an identical seed. The seed is
/// not security-sensitive: it is computed from plaintext the caller
/// already holds, and only the encrypted rendering is ever persisted.
pub fn compute_seed(body: &str) -> u64 {
    let digest = Sha256::digest(body.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().expect("SHA-256 digest is 32 bytes"))
}
