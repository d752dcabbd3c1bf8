//! Word normalization for the blind index.
//!
//! Queries and entry text must normalize identically or exact-match search
//! silently misses; every rule here applies to both sides of the index.

/// Minimum length of a normalized word worth indexing.
pub const MIN_TOKEN_LEN: usize = 3;

/// Words too common to be useful search terms. Must stay sorted: lookups
/// use binary search.
const STOP_WORDS: &[&str] = &[
    "about", "after", "all", "and", "any", "are", "because", "been", "before", "but", "can",
    "could", "did", "for", "from", "had", "has", "have", "her", "him", "his", "how", "into", "its",
    "not", "our", "out", "she", "should", "that", "the", "their", "them", "then", "there", "they",
    "this", "those", "was", "were", "what", "when", "where", "which", "who", "will", "with",
    "would", "you", "your",
];

/// Returns true if `word` is a stop word. Expects already-lowercased input.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Folds common Latin diacritics to their base letter. Expects lowercase
/// input; characters outside the table pass through unchanged.
fn fold_diacritic(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è'..='ë' | 'ē' | 'ė' | 'ę' => 'e',
        'ì'..='ï' | 'ī' | 'į' => 'i',
        'ñ' | 'ń' => 'n',
        'ò'..='ö' | 'ø' | 'ō' => 'o',
        'ß' | 'š' | 'ś' => 's',
        'ù'..='ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        _ => c,
    }
}

/// Normalizes a single word for indexing.
///
/// Lowercases, folds Latin diacritics, and strips any non-alphanumeric
/// characters. Returns `None` for words that normalize below
/// [`MIN_TOKEN_LEN`] or into the stop-word set.
pub fn normalize(word: &str) -> Option<String> {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        for lower in c.to_lowercase() {
            let folded = fold_diacritic(lower);
            if folded.is_alphanumeric() {
                out.push(folded);
            }
        }
    }

    if out.chars().count() < MIN_TOKEN_LEN || is_stop_word(&out) {
        None
    } else {
        Some(out)
    }
}

/// Splits `text` into normalized words.
///
/// The iterator is lazy, finite, restartable, and purely derived from the
/// input: tokenizing the same text twice yields the same sequence.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter_map(normalize)
}
