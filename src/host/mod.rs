// src/host/mod.rs
//! Contract with the privileged background process.
//!
//! The front end never owns settings, vaults or credentials; it asks the host
//! through [`MessageHost`]. [`LocalHost`] is an in-process implementation and
//! [`HostClient`] reaches any host over a request/response channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::models::{GeneratedValue, GeneratorSettings, SettingsError};

pub mod channel;
pub mod local;

pub use channel::{HostClient, HostRequest, HostResponse};
pub use local::LocalHost;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum HostError {
    #[error("Current password is incorrect")]
    Authentication,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No unlocked vault context")]
    Locked,

    #[error("Message channel error: {0}")]
    Channel(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl From<std::io::Error> for HostError {
    fn from(e: std::io::Error) -> Self {
        HostError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for HostError {
    fn from(e: serde_json::Error) -> Self {
        HostError::Storage(format!("JSON error: {}", e))
    }
}

impl From<SettingsError> for HostError {
    fn from(e: SettingsError) -> Self {
        HostError::InvalidRequest(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HostError>;

#[async_trait]
pub trait MessageHost: Send + Sync {
    /// Replace the authoritative generator settings. Last write wins.
    async fn edit_generator_settings(&self, settings: GeneratorSettings) -> Result<()>;

    async fn generator_settings(&self) -> Result<GeneratorSettings>;

    /// Authoritative settings as they change.
    fn subscribe_settings(&self) -> watch::Receiver<GeneratorSettings>;

    /// A fresh password from the current settings, or `None` when generation
    /// is impossible right now.
    async fn generate_password(&self) -> Result<Option<String>>;

    async fn generated_history(&self) -> Result<Vec<GeneratedValue>>;

    async fn change_root_password(&self, old_password: &str, new_sentence: &str) -> Result<()>;

    async fn create_vault(&self, name: &str) -> Result<()>;

    async fn restore(&self, url: &str) -> Result<()>;
}
