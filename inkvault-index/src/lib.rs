//! Keyed blind index for InkVault search.
//!
//! Turns entry text into a set of one-way token hashes that support exact
//! word lookup without storing recoverable plaintext:
//! - [`normalize`] / [`tokenize`] — word normalization shared by the index
//!   and query sides
//! - [`index_tokens`] / [`match_query`] — keyed HMAC-SHA256 token sets
//!
//! The crate never sees ciphertext or the persistence layer; it maps text
//! and a [`inkvault_crypto::SearchKey`] to [`TokenHash`] sets and nothing
//! else.

mod normalize;
mod token;

pub use normalize::{MIN_TOKEN_LEN, is_stop_word, normalize, tokenize};
pub use token::{TOKEN_SIZE, TokenHash, index_tokens, match_query, token_for};
