use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Splits `text` on whitespace or non-printable bytes; drops tokens of length <= 1.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|t| t.chars().count() > 1)
        .map(|t| t.to_string())
        .collect()
}

fn stable_hash(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Computes the 64-bit SimHash of `text` via bigram shingling over whitespace tokens.
/// Returns `(simhash, token_count)`.
pub fn calculate(text: &str) -> (u64, usize) {
    let tokens = tokenize(text);
    let mut accumulator = [0i64; 64];

    for window in tokens.windows(2) {
        let shingle = format!("{} {}", window[0], window[1]);
        let hash = stable_hash(&shingle);
        for (b, slot) in accumulator.iter_mut().enumerate() {
            if (hash >> b) & 1 == 1 {
                *slot += 1;
            } else {
                *slot -= 1;
            }
        }
    }

    let mut simhash: u64 = 0;
    for &slot in accumulator.iter() {
        let bit = if slot >= 0 { 1 } else { 0 };
        simhash = (simhash << 1) | bit;
    }

    (simhash, tokens.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_single_character_tokens() {
        let tokens = tokenize("hi a bb  c\td");
        assert_eq!(tokens, vec!["hi".to_string(), "bb".to_string()]);
    }

    #[test]
    fn fewer_than_two_tokens_yields_all_ones_hash() {
        let (hash, count) = calculate("solo");
        assert_eq!(count, 1);
        // accumulator never touched (no bigram since only one token) -> every slot is 0 -> bit>=0 for all
        assert_eq!(hash, u64::MAX);
    }

    #[test]
    fn empty_text_yields_all_ones_hash() {
        let (hash, count) = calculate("");
        assert_eq!(count, 0);
        assert_eq!(hash, u64::MAX);
    }

    #[test]
    fn identical_text_yields_identical_hash() {
        let (h1, _) = calculate("the quick brown fox jumps over the lazy dog");
        let (h2, _) = calculate("the quick brown fox jumps over the lazy dog");
        assert_eq!(h1, h2);
    }
}
