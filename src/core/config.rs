// src/core/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use log::LevelFilter;

use crate::models::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

// Runtime configuration for the generator front end
#[derive(Debug, Clone)]
pub struct Config {
    // Draft synchronization
    pub quiet_period: Duration,
    pub channel_buffer: usize,

    // Password Generation
    pub default_password_length: usize,
    pub sentence_word_count: usize,
    pub history_limit: usize,

    // Host storage
    pub settings_file: Option<PathBuf>,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Draft synchronization
            quiet_period: Duration::from_millis(300),
            channel_buffer: 32,

            // Password Generation
            default_password_length: 16,
            sentence_word_count: 6,
            history_limit: 100,

            // Host storage
            settings_file: None, // Will be initialized in load()

            // Logging
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> Self {
        let mut config = Config::default();

        config.settings_file = crate::utils::get_app_config_dir()
            .map(|path| path.join("generator_settings.json"));

        // Draft synchronization
        if let Ok(val) = env::var("QUIET_PERIOD_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                config.quiet_period = Duration::from_millis(ms);
            }
        }

        if let Ok(val) = env::var("CHANNEL_BUFFER") {
            if let Ok(buffer) = val.parse::<usize>() {
                if buffer > 0 {
                    config.channel_buffer = buffer;
                }
            }
        }

        // Password Generation
        if let Ok(val) = env::var("DEFAULT_PASSWORD_LENGTH") {
            if let Ok(length) = val.parse::<usize>() {
                if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
                    config.default_password_length = length;
                } else {
                    log::warn!("DEFAULT_PASSWORD_LENGTH {} is out of range, keeping {}", length, config.default_password_length);
                }
            }
        }

        if let Ok(val) = env::var("SENTENCE_WORD_COUNT") {
            if let Ok(count) = val.parse() {
                config.sentence_word_count = count;
            }
        }

        if let Ok(val) = env::var("HISTORY_LIMIT") {
            if let Ok(limit) = val.parse() {
                config.history_limit = limit;
            }
        }

        // Host storage
        if let Ok(file) = env::var("SETTINGS_FILE") {
            config.settings_file = if file.is_empty() {
                None
            } else {
                Some(PathBuf::from(file))
            };
        }

        // Logging
        if let Ok(level) = env::var("LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => {}
            }
        }

        if let Ok(file) = env::var("LOG_FILE") {
            config.log_file = Some(PathBuf::from(file));
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process wide, so everything lives in one test
    #[test]
    fn test_env_overrides() {
        env::set_var("QUIET_PERIOD_MS", "750");
        env::set_var("DEFAULT_PASSWORD_LENGTH", "99");
        env::set_var("SENTENCE_WORD_COUNT", "8");
        env::set_var("SETTINGS_FILE", "");
        env::set_var("LOG_LEVEL", "DEBUG");

        let config = Config::load();
        assert_eq!(config.quiet_period, Duration::from_millis(750));
        assert_eq!(config.default_password_length, 16);
        assert_eq!(config.sentence_word_count, 8);
        assert_eq!(config.settings_file, None);
        assert_eq!(config.log_level, LevelFilter::Debug);

        for key in ["QUIET_PERIOD_MS", "DEFAULT_PASSWORD_LENGTH", "SENTENCE_WORD_COUNT", "SETTINGS_FILE", "LOG_LEVEL"] {
            env::remove_var(key);
        }
    }
}
