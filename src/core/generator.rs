// src/core/generator.rs
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::generators::{compute_entropy_bits, StrengthRating};
use crate::host::{HostError, MessageHost};
use crate::models::GeneratorSettings;
use crate::sync::{ActionState, ActionTracker, CommitFn, DebouncedState};

/// Generator settings draft kept in sync with the host.
///
/// Edits are committed through `edit_generator_settings` after the quiet
/// period; settings pushed by the host flow back in through its watch
/// channel.
pub struct GeneratorSettingsBinding {
    state: DebouncedState<GeneratorSettings>,
    listener: JoinHandle<()>,
}

impl GeneratorSettingsBinding {
    pub fn connect<H>(host: Arc<H>, quiet_period: Duration) -> Self
    where
        H: MessageHost + 'static,
    {
        let mut updates = host.subscribe_settings();
        let initial = updates.borrow_and_update().clone();

        let commit: CommitFn<GeneratorSettings> = Arc::new(move |settings: GeneratorSettings| {
            let host = Arc::clone(&host);
            async move { host.edit_generator_settings(settings).await }.boxed()
        });
        let state = DebouncedState::new(initial, quiet_period, commit);

        let listener_state = state.clone();
        let listener = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let settings = updates.borrow_and_update().clone();
                listener_state.on_external_update(settings);
            }
            log::debug!("Settings subscription ended");
        });

        Self { state, listener }
    }

    pub fn current(&self) -> GeneratorSettings {
        self.state.current()
    }

    pub fn set(&self, settings: GeneratorSettings) {
        self.state.set_local(settings);
    }

    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut GeneratorSettings),
    {
        self.state.update_local(edit);
    }

    /// Live estimate for the draft, before the host has seen it.
    pub fn entropy_bits(&self) -> f64 {
        compute_entropy_bits(&self.current())
    }

    pub fn strength(&self) -> StrengthRating {
        StrengthRating::from_bits(self.entropy_bits())
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn last_commit_error(&self) -> Option<HostError> {
        self.state.last_commit_error()
    }

    pub fn state(&self) -> &DebouncedState<GeneratorSettings> {
        &self.state
    }
}

impl Drop for GeneratorSettingsBinding {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Password generator panel: settings draft plus the "generate" action.
pub struct GeneratorController<H> {
    host: Arc<H>,
    settings: GeneratorSettingsBinding,
    generate: ActionTracker<Option<String>, HostError>,
}

impl<H> GeneratorController<H>
where
    H: MessageHost + 'static,
{
    pub fn new(host: Arc<H>, quiet_period: Duration) -> Self {
        Self {
            settings: GeneratorSettingsBinding::connect(Arc::clone(&host), quiet_period),
            host,
            generate: ActionTracker::new(),
        }
    }

    pub fn settings(&self) -> &GeneratorSettingsBinding {
        &self.settings
    }

    /// Ask the host for a password; the outcome shows up in [`Self::generated`].
    pub fn request_password(&self) -> JoinHandle<()> {
        let host = Arc::clone(&self.host);
        self.generate.invoke(async move { host.generate_password().await })
    }

    pub fn generated(&self) -> ActionState<Option<String>, HostError> {
        self.generate.snapshot()
    }

    pub fn clear_generated(&self) {
        self.generate.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LocalHost;
    use tokio::time::sleep;

    const QUIET: Duration = Duration::from_millis(300);

    fn host() -> Arc<LocalHost> {
        Arc::new(LocalHost::new(GeneratorSettings::default(), "root", 10).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_binding_commits_settled_draft() {
        let host = host();
        let binding = GeneratorSettingsBinding::connect(Arc::clone(&host), QUIET);

        for length in [10, 11, 12] {
            binding.update(|s| s.password_length = length);
        }
        assert_eq!(binding.current().password_length, 12);
        assert_eq!(host.generator_settings().await.unwrap().password_length, 16);

        sleep(Duration::from_millis(400)).await;
        assert_eq!(host.generator_settings().await.unwrap().password_length, 12);
        assert_eq!(binding.state().commits_sent(), 1);
        assert!(!binding.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_binding_follows_host_pushes() {
        let host = host();
        let binding = GeneratorSettingsBinding::connect(Arc::clone(&host), QUIET);

        let pushed = GeneratorSettings::default().with_length(33);
        host.edit_generator_settings(pushed.clone()).await.unwrap();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(binding.current(), pushed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_commit_is_reported() {
        let host = host();
        let binding = GeneratorSettingsBinding::connect(Arc::clone(&host), QUIET);
        binding.update(|s| s.password_length = 99);

        sleep(Duration::from_millis(400)).await;
        assert!(matches!(binding.last_commit_error(), Some(HostError::InvalidRequest(_))));
        assert_eq!(binding.current().password_length, 99);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entropy_label_tracks_draft() {
        let host = host();
        let binding = GeneratorSettingsBinding::connect(host, QUIET);
        binding.update(|s| {
            s.password_letters = false;
            s.password_symbols = false;
            s.password_length = 4;
        });
        assert!((binding.entropy_bits() - 4.0 * 10f64.log2()).abs() < 1e-9);
        assert_eq!(binding.strength(), StrengthRating::VeryWeak);
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_generates() {
        let host = host();
        let controller = GeneratorController::new(Arc::clone(&host), QUIET);
        controller.request_password().await.unwrap();

        let state = controller.generated();
        assert!(!state.in_progress);
        assert_eq!(state.last_result.unwrap().unwrap().chars().count(), 16);

        host.lock_vault();
        controller.request_password().await.unwrap();
        assert_eq!(controller.generated().last_result, Some(None));
    }
}
