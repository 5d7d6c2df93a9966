// src/generators/password.rs
use rand::rngs::OsRng;
use rand::Rng;
use rand_core::{CryptoRng, RngCore};

use crate::generators::alphabet::Alphabet;
use crate::models::GeneratorSettings;

/// Bits of entropy of a password produced with `settings`.
///
/// Called on every settings edit to refresh the strength label, so it stays a
/// pure function of its input.
pub fn compute_entropy_bits(settings: &GeneratorSettings) -> f64 {
    let alphabet = Alphabet::from_settings(settings);
    if alphabet.is_empty() {
        return 0.0;
    }
    (alphabet.len() as f64).log2() * settings.password_length as f64
}

/// Draw `password_length` characters uniformly from the settings' alphabet.
///
/// Returns `None` when the alphabet is empty; callers show "no password"
/// rather than an empty string.
pub fn generate_password<R>(settings: &GeneratorSettings, rng: &mut R) -> Option<String>
where
    R: RngCore + CryptoRng,
{
    let alphabet = Alphabet::from_settings(settings);
    if alphabet.is_empty() {
        return None;
    }

    let chars = alphabet.as_slice();
    let password = (0..settings.password_length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect();
    Some(password)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthRating {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl StrengthRating {
    pub fn from_bits(bits: f64) -> Self {
        if bits < 28.0 {
            StrengthRating::VeryWeak
        } else if bits < 36.0 {
            StrengthRating::Weak
        } else if bits < 60.0 {
            StrengthRating::Fair
        } else if bits < 80.0 {
            StrengthRating::Strong
        } else {
            StrengthRating::VeryStrong
        }
    }
}

impl std::fmt::Display for StrengthRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrengthRating::VeryWeak => write!(f, "Very weak"),
            StrengthRating::Weak => write!(f, "Weak"),
            StrengthRating::Fair => write!(f, "Fair"),
            StrengthRating::Strong => write!(f, "Strong"),
            StrengthRating::VeryStrong => write!(f, "Very strong"),
        }
    }
}

/// Generator bound to the operating system's CSPRNG.
pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        PasswordGenerator
    }

    pub fn generate_password(&self, settings: &GeneratorSettings) -> Option<String> {
        generate_password(settings, &mut OsRng)
    }

    pub fn generate_words(&self, count: usize) -> Vec<String> {
        crate::generators::generate_random_words(count, &mut OsRng)
    }

    pub fn entropy_bits(&self, settings: &GeneratorSettings) -> f64 {
        compute_entropy_bits(settings)
    }
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new()
    }
}
