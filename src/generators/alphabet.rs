// src/generators/alphabet.rs
use std::collections::HashSet;

use crate::models::GeneratorSettings;

pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

/// Deduplicated set of characters a password may be drawn from.
///
/// Entropy estimation and generation both go through this type, so they can
/// never disagree on the alphabet size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    pub fn from_settings(settings: &GeneratorSettings) -> Self {
        let mut seen = HashSet::new();
        let mut chars = Vec::new();

        let classes = [
            (settings.password_letters, LETTERS),
            (settings.password_digits, DIGITS),
            (settings.password_symbols, SYMBOLS),
        ];
        for (enabled, class) in classes {
            if enabled {
                for c in class.chars() {
                    if seen.insert(c) {
                        chars.push(c);
                    }
                }
            }
        }

        // Extra characters only count once, and only if no enabled class has them
        for c in settings.password_extra.chars() {
            if c.is_whitespace() || c.is_control() {
                continue;
            }
            if seen.insert(c) {
                chars.push(c);
            }
        }

        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(letters: bool, digits: bool, symbols: bool, extra: &str) -> GeneratorSettings {
        GeneratorSettings {
            password_length: 12,
            password_letters: letters,
            password_digits: digits,
            password_symbols: symbols,
            password_extra: extra.to_string(),
        }
    }

    #[test]
    fn test_class_sizes() {
        assert_eq!(Alphabet::from_settings(&settings(true, false, false, "")).len(), 52);
        assert_eq!(Alphabet::from_settings(&settings(false, true, false, "")).len(), 10);
        assert_eq!(Alphabet::from_settings(&settings(false, false, true, "")).len(), SYMBOLS.len());
        assert_eq!(Alphabet::from_settings(&settings(true, true, true, "")).len(), 52 + 10 + SYMBOLS.len());
    }

    #[test]
    fn test_extra_is_deduplicated() {
        // 'a' and '1' are already covered, 'é' counts once
        let alphabet = Alphabet::from_settings(&settings(true, true, false, "a1ééa"));
        assert_eq!(alphabet.len(), 63);
        assert!(alphabet.contains('é'));
    }

    #[test]
    fn test_extra_alone() {
        let alphabet = Alphabet::from_settings(&settings(false, false, false, "xyx \n"));
        assert_eq!(alphabet.as_slice(), &['x', 'y']);
    }

    #[test]
    fn test_empty() {
        assert!(Alphabet::from_settings(&settings(false, false, false, "")).is_empty());
    }
}
