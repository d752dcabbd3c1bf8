//! Keyed token hashing.
//!
//! Each normalized word is mapped to `HMAC-SHA256(search_key, word)`. The
//! persisted index holds only these hashes, so an observer without the
//! search key learns which entries share words (access pattern) but not
//! the words themselves; recovering a word requires a keyed dictionary
//! attack, which the key prevents.

use crate::normalize::tokenize;
use hmac::{Hmac, Mac};
use inkvault_crypto::SearchKey;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeSet;

/// Size of a token hash in bytes (HMAC-SHA256 output).
pub const TOKEN_SIZE: usize = 32;

/// A keyed one-way hash of a normalized word.
///
/// Ordered so token sets iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenHash([u8; TOKEN_SIZE]);

impl TokenHash {
    /// Creates a token hash from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; TOKEN_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a token hash from a slice, if it has the right length.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    /// Returns the hash bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; TOKEN_SIZE] {
        &self.0
    }
}

/// Derives the token hash for a single normalized word.
pub fn token_for(key: &SearchKey, word: &str) -> TokenHash {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(word.as_bytes());
    TokenHash(mac.finalize().into_bytes().into())
}

/// Computes the deduplicated token set for a piece of entry text.
///
/// Order-irrelevant: two texts containing the same words produce equal
/// sets under the same key.
pub fn index_tokens(key: &SearchKey, text: &str) -> BTreeSet<TokenHash> {
    tokenize(text).map(|word| token_for(key, &word)).collect()
}

/// Computes the token set to look up for a search query.
///
/// Same normalization pipeline as [`index_tokens`]; callers intersect the
/// posting lists of every returned token (conjunctive matching).
pub fn match_query(key: &SearchKey, query: &str) -> BTreeSet<TokenHash> {
    index_tokens(key, query)
}
