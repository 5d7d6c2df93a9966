// src/generators/words.rs
use lazy_static::lazy_static;
use rand::seq::index;
use rand_core::{CryptoRng, RngCore};

lazy_static! {
    static ref WORDLIST: Vec<&'static str> = include_str!("wordlist.txt")
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .collect();
}

pub fn wordlist_len() -> usize {
    WORDLIST.len()
}

/// Draw `count` distinct words for a memorable-sentence challenge.
///
/// Requests larger than the wordlist are clamped to its size.
pub fn generate_random_words<R>(count: usize, rng: &mut R) -> Vec<String>
where
    R: RngCore + CryptoRng,
{
    let amount = count.min(WORDLIST.len());
    if amount < count {
        log::warn!("Requested {} words but the wordlist only has {}", count, WORDLIST.len());
    }

    index::sample(rng, WORDLIST.len(), amount)
        .into_iter()
        .map(|i| WORDLIST[i].to_string())
        .collect()
}

/// Check a typed sentence against the challenge words.
///
/// Case and spacing are not significant; word order is.
pub fn sentence_matches(words: &[String], input: &str) -> bool {
    if words.is_empty() {
        return false;
    }
    let typed: Vec<String> = input.split_whitespace().map(str::to_lowercase).collect();
    typed.len() == words.len()
        && typed.iter().zip(words).all(|(t, w)| *t == w.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn test_wordlist_is_large_and_unique() {
        assert!(wordlist_len() > 1000);
        let unique: HashSet<_> = WORDLIST.iter().collect();
        assert_eq!(unique.len(), WORDLIST.len());
    }

    #[test]
    fn test_words_are_distinct() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..50 {
            let words = generate_random_words(12, &mut rng);
            assert_eq!(words.len(), 12);
            let unique: HashSet<_> = words.iter().collect();
            assert_eq!(unique.len(), 12);
        }
    }

    #[test]
    fn test_calls_are_independent() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let first = generate_random_words(8, &mut rng);
        let second = generate_random_words(8, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_count_is_clamped() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        assert_eq!(generate_random_words(wordlist_len() + 10, &mut rng).len(), wordlist_len());
        assert!(generate_random_words(0, &mut rng).is_empty());
    }

    #[test]
    fn test_sentence_matches() {
        let words = vec!["amber".to_string(), "falcon".to_string(), "river".to_string()];
        assert!(sentence_matches(&words, "amber falcon river"));
        assert!(sentence_matches(&words, "  Amber   FALCON river "));
        assert!(!sentence_matches(&words, "falcon amber river"));
        assert!(!sentence_matches(&words, "amber falcon"));
        assert!(!sentence_matches(&[], ""));
    }
}
