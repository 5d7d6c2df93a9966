// src/core/mod.rs
pub mod auth;
pub mod config;
pub mod generator;
pub mod vault;

pub use auth::{RootField, RootPasswordChange};
pub use config::Config;
pub use generator::{GeneratorController, GeneratorSettingsBinding};
pub use vault::{RestoreRequest, VaultCreation};
