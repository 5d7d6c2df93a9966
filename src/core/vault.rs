// src/core/vault.rs
use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

use crate::host::{HostError, MessageHost};
use crate::storage::{StorageConfig, StorageProvider};
use crate::sync::{check, ActionState, ActionTracker, FieldSpec, FormState, ValidationError};

pub const MAX_VAULT_NAME_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaultField {
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestoreField {
    Url,
}

fn valid_vault_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_VAULT_NAME_LENGTH
}

fn valid_restore_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https" | "file"))
        .unwrap_or(false)
}

/// "New vault" dialog: a name plus the storage backend it will live on.
pub struct VaultCreation<H> {
    host: Arc<H>,
    form: FormState<VaultField, String>,
    storage: StorageConfig,
    action: ActionTracker<(), HostError>,
}

impl<H> VaultCreation<H>
where
    H: MessageHost + 'static,
{
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            form: FormState::new(vec![(
                VaultField::Name,
                FieldSpec::new(None).validator(check(|v: &String| valid_vault_name(v))),
            )]),
            storage: StorageProvider::Local.initial_config(),
            action: ActionTracker::new(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.form.set_field(VaultField::Name, Some(name.to_string()));
    }

    /// Switching backend starts from that backend's blank configuration.
    pub fn select_provider(&mut self, provider: StorageProvider) {
        if self.storage.provider() != provider {
            self.storage = provider.initial_config();
        }
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn form(&self) -> &FormState<VaultField, String> {
        &self.form
    }

    pub fn submit(&self) -> Result<JoinHandle<()>, ValidationError<VaultField>> {
        let mut values = self.form.submit()?;
        let name = values.remove(&VaultField::Name).unwrap_or_default();
        log::info!(
            "Creating vault '{}' on {} storage",
            name.trim(),
            self.storage.provider().metadata().title
        );

        let host = Arc::clone(&self.host);
        Ok(self.action.invoke(async move { host.create_vault(&name).await }))
    }

    pub fn status(&self) -> ActionState<(), HostError> {
        self.action.snapshot()
    }
}

/// Restore from an archive the host can reach by URL.
pub struct RestoreRequest<H> {
    host: Arc<H>,
    form: FormState<RestoreField, String>,
    action: ActionTracker<(), HostError>,
}

impl<H> RestoreRequest<H>
where
    H: MessageHost + 'static,
{
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            form: FormState::new(vec![(
                RestoreField::Url,
                FieldSpec::new(None).validator(check(|v: &String| valid_restore_url(v))),
            )]),
            action: ActionTracker::new(),
        }
    }

    pub fn set_url(&mut self, url: &str) {
        self.form.set_field(RestoreField::Url, Some(url.trim().to_string()));
    }

    pub fn form(&self) -> &FormState<RestoreField, String> {
        &self.form
    }

    pub fn submit(&self) -> Result<JoinHandle<()>, ValidationError<RestoreField>> {
        let mut values = self.form.submit()?;
        let url = values.remove(&RestoreField::Url).unwrap_or_default();
        let host = Arc::clone(&self.host);
        Ok(self.action.invoke(async move { host.restore(&url).await }))
    }

    pub fn status(&self) -> ActionState<(), HostError> {
        self.action.snapshot()
    }
}
