// src/cli/handlers.rs
use crate::cli::SettingsArgs;
use crate::core::config::Config;
use crate::generators::{compute_entropy_bits, PasswordGenerator, StrengthRating};
use crate::models::{GeneratorSettings, SettingsError};
use crate::storage::StorageProvider;

// Handlers for one-shot CLI commands

pub fn settings_from_args(args: &SettingsArgs, config: &Config) -> Result<GeneratorSettings, SettingsError> {
    let settings = GeneratorSettings {
        password_length: args.length.unwrap_or(config.default_password_length),
        password_letters: !args.no_letters,
        password_digits: !args.no_digits,
        password_symbols: !args.no_symbols,
        password_extra: args.extra.clone(),
    };
    settings.validate()?;
    Ok(settings)
}

pub fn handle_entropy(settings: &GeneratorSettings) -> (f64, StrengthRating) {
    let bits = compute_entropy_bits(settings);
    (bits, StrengthRating::from_bits(bits))
}

/// `None` when the settings leave no characters to draw from.
pub fn handle_generate(settings: &GeneratorSettings, count: usize) -> Option<Vec<String>> {
    let generator = PasswordGenerator::new();
    (0..count).map(|_| generator.generate_password(settings)).collect()
}

pub fn handle_words(count: usize) -> Vec<String> {
    PasswordGenerator::new().generate_words(count)
}

pub fn handle_providers() -> Vec<(StorageProvider, &'static str, &'static str)> {
    StorageProvider::ALL
        .into_iter()
        .map(|p| {
            let meta = p.metadata();
            (p, meta.title, meta.description)
        })
        .collect()
}
