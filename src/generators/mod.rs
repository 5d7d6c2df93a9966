// src/generators/mod.rs
pub mod alphabet;
pub mod password;
pub mod words;

pub use alphabet::Alphabet;
pub use password::{compute_entropy_bits, generate_password, PasswordGenerator, StrengthRating};
pub use words::{generate_random_words, sentence_matches};
