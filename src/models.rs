// src/models.rs
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 4;
pub const MAX_PASSWORD_LENGTH: usize = 40;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Password length must be between 4 and 40, got {0}")]
    LengthOutOfRange(usize),
}

/// Password generator settings as exchanged with the background process.
///
/// A new value always replaces the old one wholesale; there is no partial
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    pub password_length: usize,
    pub password_letters: bool,
    pub password_digits: bool,
    pub password_symbols: bool,
    #[serde(default)]
    pub password_extra: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            password_length: 16,
            password_letters: true,
            password_digits: true,
            password_symbols: true,
            password_extra: String::new(),
        }
    }
}

impl GeneratorSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&self.password_length) {
            return Err(SettingsError::LengthOutOfRange(self.password_length));
        }
        Ok(())
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.password_length = length;
        self
    }
}

// One entry of the generation history kept by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedValue {
    pub uuid: Uuid,
    pub creation_timestamp: DateTime<Utc>,
    pub entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_length_bounds() {
        assert!(GeneratorSettings::default().validate().is_ok());
        assert!(GeneratorSettings::default().with_length(4).validate().is_ok());
        assert!(GeneratorSettings::default().with_length(40).validate().is_ok());
        assert_eq!(
            GeneratorSettings::default().with_length(3).validate(),
            Err(SettingsError::LengthOutOfRange(3))
        );
        assert_eq!(
            GeneratorSettings::default().with_length(41).validate(),
            Err(SettingsError::LengthOutOfRange(41))
        );
    }

    #[test]
    fn test_settings_use_camel_case_keys() {
        let json = serde_json::to_value(GeneratorSettings::default()).unwrap();
        assert_eq!(json["passwordLength"], 16);
        assert_eq!(json["passwordExtra"], "");

        let parsed: GeneratorSettings = serde_json::from_str(
            r#"{"passwordLength":8,"passwordLetters":false,"passwordDigits":true,"passwordSymbols":false}"#,
        )
        .unwrap();
        assert_eq!(parsed.password_length, 8);
        assert!(parsed.password_extra.is_empty());
    }
}
