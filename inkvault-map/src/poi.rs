//! Point-of-interest extraction and placement.
//!
//! POIs are the most frequent meaningful words of the entry body, placed
//! at hash-derived cells. Both steps are deterministic so that the same
//! body always produces the same marked map.

use crate::grid::Poi;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};

/// Minimum word length considered for a POI.
const POI_MIN_WORD_LEN: usize = 4;

/// Filler words that make poor map labels. Sorted for binary search.
const POI_STOP_WORDS: &[&str] = &[
    "about", "could", "from", "have", "ours", "over", "should", "than", "that", "their", "them",
    "then", "there", "these", "they", "this", "those", "under", "were", "what", "when", "where",
    "which", "while", "whom", "whose", "with", "would", "your",
];

/// Extracts the top-K keywords from body text by frequency.
///
/// Words are lowercased, must be at least [`POI_MIN_WORD_LEN`] characters,
/// and must not be stop words. Ties in frequency break by first occurrence
/// order, so the ranking is stable for a given text.
pub fn extract_pois(body: &str, top_k: usize) -> Vec<String> {
    // word -> (count, first occurrence index)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0usize;

    for raw in body.split(|c: char| !c.is_alphabetic()) {
        let word: String = raw.chars().flat_map(char::to_lowercase).collect();
        if word.chars().count() < POI_MIN_WORD_LEN
            || POI_STOP_WORDS.binary_search(&word.as_str()).is_ok()
        {
            continue;
        }
        counts
            .entry(word)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, order));
        order += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(top_k);
    ranked.into_iter().map(|(word, _, _)| word).collect()
}

/// Derives a deterministic interior cell for a ranked keyword.
fn cell_for(seed: u64, word: &str, rank: usize, width: usize, height: usize) -> (usize, usize) {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_be_bytes());
    hasher.update(b"poi");
    hasher.update(word.as_bytes());
    hasher.update((rank as u32).to_be_bytes());
    let digest = hasher.finalize();

    let hx = u32::from_be_bytes(digest[0..4].try_into().expect("SHA-256 digest is 32 bytes"));
    let hy = u32::from_be_bytes(digest[4..8].try_into().expect("SHA-256 digest is 32 bytes"));

    // Border cells are reserved so markers stay visible.
    let x = 1 + hx as usize % (width - 2);
    let y = 1 + hy as usize % (height - 2);
    (x, y)
}

/// Places ranked keywords on the grid.
///
/// Each POI lands on its hash-derived cell; if that cell is already
/// occupied, placement probes linearly through the interior (row-major,
/// wrapping) to the next free cell. Requires `width >= 3 && height >= 3`,
/// which [`crate::MapConfig::validate`] guarantees.
pub fn place_pois(seed: u64, width: usize, height: usize, words: &[String]) -> Vec<Poi> {
    let interior = (width - 2) * (height - 2);
    let mut taken: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut pois = Vec::with_capacity(words.len());

    for (rank, word) in words.iter().enumerate() {
        if taken.len() >= interior {
            break;
        }
        let (mut x, mut y) = cell_for(seed, word, rank, width, height);
        while taken.contains(&(x, y)) {
            x += 1;
            if x > width - 2 {
                x = 1;
                y += 1;
                if y > height - 2 {
                    y = 1;
                }
            }
        }
        taken.insert((x, y));
        pois.push(Poi {
            word: word.clone(),
            x,
            y,
        });
    }

    pois
}
