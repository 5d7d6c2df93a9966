// src/storage.rs
//! Remote storage backends a vault can live on.
//!
//! Every lookup is a `match` over [`StorageProvider`], so adding a backend
//! without describing it does not compile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Local,
    GDrive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum StorageConfig {
    Local,
    GDrive {
        #[serde(default)]
        folder_id: Option<String>,
        #[serde(default)]
        account_email: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub title: &'static str,
    pub description: &'static str,
    pub requires_auth: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown storage provider '{0}'")]
pub struct UnknownProvider(pub String);

impl StorageProvider {
    pub const ALL: [StorageProvider; 2] = [StorageProvider::Local, StorageProvider::GDrive];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageProvider::Local => "local",
            StorageProvider::GDrive => "gdrive",
        }
    }

    pub fn metadata(self) -> ProviderMetadata {
        match self {
            StorageProvider::Local => ProviderMetadata {
                title: "This device",
                description: "Vault data stays in the browser's local storage",
                requires_auth: false,
            },
            StorageProvider::GDrive => ProviderMetadata {
                title: "Google Drive",
                description: "Vault data is synced to a folder in your Google Drive",
                requires_auth: true,
            },
        }
    }

    pub fn initial_config(self) -> StorageConfig {
        match self {
            StorageProvider::Local => StorageConfig::Local,
            StorageProvider::GDrive => StorageConfig::GDrive {
                folder_id: None,
                account_email: None,
            },
        }
    }
}

impl StorageConfig {
    pub fn provider(&self) -> StorageProvider {
        match self {
            StorageConfig::Local => StorageProvider::Local,
            StorageConfig::GDrive { .. } => StorageProvider::GDrive,
        }
    }
}

impl fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageProvider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}
