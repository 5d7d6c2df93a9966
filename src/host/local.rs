// src/host/local.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::OsRng;
use tokio::sync::watch;
use url::Url;
use uuid::Uuid;

use crate::core::config::Config;
use crate::generators;
use crate::host::{HostError, MessageHost, Result};
use crate::models::{GeneratedValue, GeneratorSettings, VaultRecord};

const RESTORE_SCHEMES: [&str; 3] = ["http", "https", "file"];

struct HostState {
    root_hash: String,
    unlocked: bool,
    history: Vec<GeneratedValue>,
    vaults: Vec<VaultRecord>,
    restores: Vec<Url>,
}

/// In-process background host.
///
/// Keeps the root credential as an Argon2 hash, the generator settings
/// (optionally persisted as JSON) and the generation history.
pub struct LocalHost {
    state: Mutex<HostState>,
    settings_tx: watch::Sender<GeneratorSettings>,
    settings_path: Option<PathBuf>,
    history_limit: usize,
}

fn hash_secret(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HostError::Hashing(e.to_string()))
}

fn verify_secret(secret: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| HostError::Hashing(e.to_string()))?;
    Ok(Argon2::default().verify_password(secret.as_bytes(), &parsed).is_ok())
}

impl LocalHost {
    pub fn new(settings: GeneratorSettings, root_password: &str, history_limit: usize) -> Result<Self> {
        settings.validate()?;
        let (settings_tx, _) = watch::channel(settings);
        Ok(Self {
            state: Mutex::new(HostState {
                root_hash: hash_secret(root_password)?,
                unlocked: true,
                history: Vec::new(),
                vaults: Vec::new(),
                restores: Vec::new(),
            }),
            settings_tx,
            settings_path: None,
            history_limit,
        })
    }

    /// Host whose settings live in `path`; a missing file means defaults.
    pub fn with_settings_file(
        path: impl AsRef<Path>,
        defaults: GeneratorSettings,
        root_password: &str,
        history_limit: usize,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let settings = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let loaded: GeneratorSettings = serde_json::from_str(&content)?;
            log::info!("Loaded generator settings from {}", path.display());
            loaded
        } else {
            log::info!("No settings file at {}, using defaults", path.display());
            defaults
        };

        let mut host = Self::new(settings, root_password, history_limit)?;
        host.settings_path = Some(path);
        Ok(host)
    }

    pub fn from_config(config: &Config, root_password: &str) -> Result<Self> {
        let defaults = GeneratorSettings::default().with_length(config.default_password_length);
        match &config.settings_file {
            Some(path) => Self::with_settings_file(path, defaults, root_password, config.history_limit),
            None => Self::new(defaults, root_password, config.history_limit),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn lock_vault(&self) {
        self.lock().unlocked = false;
        log::info!("Vault context locked");
    }

    pub fn unlock(&self, root_password: &str) -> Result<()> {
        let stored = self.lock().root_hash.clone();
        if !verify_secret(root_password, &stored)? {
            log::warn!("Unlock rejected: wrong root password");
            return Err(HostError::Authentication);
        }
        self.lock().unlocked = true;
        Ok(())
    }

    pub fn is_unlocked(&self) -> bool {
        self.lock().unlocked
    }

    pub fn vaults(&self) -> Vec<VaultRecord> {
        self.lock().vaults.clone()
    }

    pub fn restores(&self) -> Vec<Url> {
        self.lock().restores.clone()
    }

    fn persist_settings(&self, settings: &GeneratorSettings) -> Result<()> {
        if let Some(path) = &self.settings_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, serde_json::to_string_pretty(settings)?)?;
            log::debug!("Saved generator settings to {}", path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl MessageHost for LocalHost {
    async fn edit_generator_settings(&self, settings: GeneratorSettings) -> Result<()> {
        settings.validate()?;
        self.persist_settings(&settings)?;
        self.settings_tx.send_replace(settings);
        log::debug!("Generator settings replaced");
        Ok(())
    }

    async fn generator_settings(&self) -> Result<GeneratorSettings> {
        Ok(self.settings_tx.borrow().clone())
    }

    fn subscribe_settings(&self) -> watch::Receiver<GeneratorSettings> {
        self.settings_tx.subscribe()
    }

    async fn generate_password(&self) -> Result<Option<String>> {
        let settings = self.settings_tx.borrow().clone();
        let mut state = self.lock();
        if !state.unlocked {
            log::debug!("Password generation skipped: vault context is locked");
            return Ok(None);
        }

        let password = match generators::generate_password(&settings, &mut OsRng) {
            Some(password) => password,
            None => {
                log::debug!("Password generation skipped: empty alphabet");
                return Ok(None);
            }
        };

        // Keep the history ordered even if the wall clock steps back
        let now = Utc::now();
        let creation_timestamp = match state.history.last() {
            Some(last) if last.creation_timestamp > now => last.creation_timestamp,
            _ => now,
        };
        state.history.push(GeneratedValue {
            uuid: Uuid::new_v4(),
            creation_timestamp,
            entropy: generators::compute_entropy_bits(&settings),
        });
        if state.history.len() > self.history_limit {
            let excess = state.history.len() - self.history_limit;
            state.history.drain(..excess);
        }

        Ok(Some(password))
    }

    async fn generated_history(&self) -> Result<Vec<GeneratedValue>> {
        Ok(self.lock().history.clone())
    }

    async fn change_root_password(&self, old_password: &str, new_sentence: &str) -> Result<()> {
        if new_sentence.trim().is_empty() {
            return Err(HostError::InvalidRequest("New root sentence is empty".to_string()));
        }

        // Argon2 runs on the blocking pool with the state lock released
        let stored = self.lock().root_hash.clone();
        let (old, new) = (old_password.to_string(), new_sentence.to_string());
        let expected = stored.clone();
        let new_hash = tokio::task::spawn_blocking(move || -> Result<Option<String>> {
            if !verify_secret(&old, &expected)? {
                return Ok(None);
            }
            hash_secret(&new).map(Some)
        })
        .await
        .map_err(|e| HostError::Hashing(e.to_string()))??;

        let Some(new_hash) = new_hash else {
            log::warn!("Root password change rejected: wrong current password");
            return Err(HostError::Authentication);
        };

        let mut state = self.lock();
        // Another change won the race; the old password is no longer current
        if state.root_hash != stored {
            log::warn!("Root password change rejected: credential changed concurrently");
            return Err(HostError::Authentication);
        }
        state.root_hash = new_hash;
        log::info!("Root password changed");
        Ok(())
    }

    async fn create_vault(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HostError::InvalidRequest("Vault name is empty".to_string()));
        }

        let mut state = self.lock();
        if !state.unlocked {
            return Err(HostError::Locked);
        }
        if state.vaults.iter().any(|v| v.name == name) {
            return Err(HostError::InvalidRequest(format!("Vault '{}' already exists", name)));
        }
        state.vaults.push(VaultRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        });
        log::info!("Created vault '{}'", name);
        Ok(())
    }

    async fn restore(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| HostError::InvalidRequest(format!("Invalid restore URL: {}", e)))?;
        if !RESTORE_SCHEMES.contains(&parsed.scheme()) {
            return Err(HostError::InvalidRequest(format!(
                "Unsupported restore URL scheme '{}'",
                parsed.scheme()
            )));
        }

        log::info!("Restore requested from {}", parsed);
        self.lock().restores.push(parsed);
        Ok(())
    }
}
