use inkvault_crypto::SearchKey;
use inkvault_index::{
    MIN_TOKEN_LEN, index_tokens, is_stop_word, match_query, normalize, token_for, tokenize,
};

fn key(byte: u8) -> SearchKey {
    SearchKey::from_bytes([byte; 32])
}

// ── normalize ────────────────────────────────────────────────────

#[test]
fn normalize_lowercases() {
    assert_eq!(normalize("River"), Some("river".to_string()));
    assert_eq!(normalize("MILL"), Some("mill".to_string()));
}

#[test]
fn normalize_strips_punctuation() {
    assert_eq!(normalize("river,"), Some("river".to_string()));
    assert_eq!(normalize("don't"), Some("dont".to_string()));
}

#[test]
fn normalize_folds_diacritics() {
    assert_eq!(normalize("café"), Some("cafe".to_string()));
    assert_eq!(normalize("Señor"), Some("senor".to_string()));
    assert_eq!(normalize("Müller"), Some("muller".to_string()));
}

#[test]
fn normalize_drops_short_words() {
    assert_eq!(normalize("at"), None);
    assert_eq!(normalize("ab!"), None);
    assert!(normalize("abc").is_some());
    assert!(MIN_TOKEN_LEN <= 3);
}

#[test]
fn normalize_drops_stop_words() {
    assert_eq!(normalize("the"), None);
    assert_eq!(normalize("The"), None);
    assert_eq!(normalize("would"), None);
    assert!(is_stop_word("their"));
    assert!(!is_stop_word("river"));
}

#[test]
fn normalize_keeps_non_latin_words() {
    assert_eq!(normalize("дневник"), Some("дневник".to_string()));
}

// ── tokenize ─────────────────────────────────────────────────────

#[test]
fn tokenize_splits_on_non_alphanumeric() {
    let tokens: Vec<String> = tokenize("The river, the mill; old stones!").collect();
    assert_eq!(tokens, vec!["river", "mill", "old", "stones"]);
}

#[test]
fn tokenize_is_restartable() {
    let text = "calm river morning";
    let first: Vec<String> = tokenize(text).collect();
    let second: Vec<String> = tokenize(text).collect();
    assert_eq!(first, second);
}

#[test]
fn tokenize_empty_text_yields_nothing() {
    assert_eq!(tokenize("").count(), 0);
    assert_eq!(tokenize("a, an & at").count(), 0);
}

// ── token hashing ────────────────────────────────────────────────

#[test]
fn token_for_is_deterministic() {
    let k = key(0x42);
    assert_eq!(token_for(&k, "river"), token_for(&k, "river"));
}

#[test]
fn different_words_different_tokens() {
    let k = key(0x42);
    assert_ne!(token_for(&k, "river"), token_for(&k, "mill"));
}

#[test]
fn different_keys_different_tokens() {
    assert_ne!(token_for(&key(1), "river"), token_for(&key(2), "river"));
}

#[test]
fn index_tokens_deduplicates() {
    let k = key(0x42);
    let tokens = index_tokens(&k, "river river river mill");
    assert_eq!(tokens.len(), 2);
}

#[test]
fn same_words_equal_token_sets() {
    let k = key(0x42);
    let a = index_tokens(&k, "the mill by the river");
    let b = index_tokens(&k, "River! Mill?");
    assert_eq!(a, b);
}

#[test]
fn different_keys_disjoint_token_sets() {
    let a = index_tokens(&key(1), "calm river morning");
    let b = index_tokens(&key(2), "calm river morning");
    assert!(a.intersection(&b).next().is_none());
}

#[test]
fn match_query_uses_index_pipeline() {
    let k = key(0x42);
    assert_eq!(match_query(&k, "River, mill."), index_tokens(&k, "river mill"));
}

#[test]
fn match_query_of_stop_words_is_empty() {
    let k = key(0x42);
    assert!(match_query(&k, "the and of").is_empty());
}
