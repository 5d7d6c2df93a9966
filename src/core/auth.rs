// src/core/auth.rs
use std::sync::Arc;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tokio::task::JoinHandle;

use crate::generators::{generate_random_words, sentence_matches};
use crate::host::{HostError, MessageHost};
use crate::sync::{check, ActionState, ActionTracker, FieldSpec, FormState, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootField {
    OldPassword,
    Sentence,
}

/// Flow for replacing the root password with a memorable sentence.
///
/// The sentence field cannot be judged until a word challenge has been
/// drawn; after that it only accepts the challenge words in order.
pub struct RootPasswordChange<H> {
    host: Arc<H>,
    form: FormState<RootField, String>,
    words: Vec<String>,
    word_count: usize,
    action: ActionTracker<(), HostError>,
}

impl<H> RootPasswordChange<H>
where
    H: MessageHost + 'static,
{
    pub fn new(host: Arc<H>, word_count: usize) -> Self {
        let form = FormState::new(vec![
            (
                RootField::OldPassword,
                FieldSpec::new(None).validator(check(|v: &String| !v.is_empty())),
            ),
            (RootField::Sentence, FieldSpec::new(None)),
        ]);

        Self {
            host,
            form,
            words: Vec::new(),
            word_count,
            action: ActionTracker::new(),
        }
    }

    /// Draw a fresh word challenge from the system CSPRNG.
    pub fn new_challenge(&mut self) -> &[String] {
        self.new_challenge_with(&mut OsRng)
    }

    pub fn new_challenge_with<R>(&mut self, rng: &mut R) -> &[String]
    where
        R: RngCore + CryptoRng,
    {
        self.words = generate_random_words(self.word_count, rng);
        let words = self.words.clone();
        self.form
            .set_validator(RootField::Sentence, check(move |v: &String| sentence_matches(&words, v)));
        &self.words
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn set_old_password(&mut self, password: &str) {
        self.form.set_field(RootField::OldPassword, Some(password.to_string()));
    }

    pub fn set_sentence(&mut self, sentence: &str) {
        self.form.set_field(RootField::Sentence, Some(sentence.to_string()));
    }

    pub fn form(&self) -> &FormState<RootField, String> {
        &self.form
    }

    /// Send the change to the host when the form is valid.
    ///
    /// The stored sentence is the challenge words joined by single spaces,
    /// whatever spacing or case the user typed.
    pub fn submit(&self) -> Result<JoinHandle<()>, ValidationError<RootField>> {
        let mut values = self.form.submit()?;
        let old_password = values.remove(&RootField::OldPassword).unwrap_or_default();
        let sentence = self.words.join(" ");

        let host = Arc::clone(&self.host);
        Ok(self
            .action
            .invoke(async move { host.change_root_password(&old_password, &sentence).await }))
    }

    pub fn status(&self) -> ActionState<(), HostError> {
        self.action.snapshot()
    }

    /// Inline message for the last failed attempt.
    pub fn feedback(&self) -> Option<String> {
        match self.action.snapshot().last_error? {
            HostError::Authentication => Some("The current password is incorrect".to_string()),
            other => Some(format!("Could not change the root password: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LocalHost;
    use crate::models::GeneratorSettings;
    use crate::sync::Validity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn flow() -> (RootPasswordChange<LocalHost>, Arc<LocalHost>) {
        let host = Arc::new(LocalHost::new(GeneratorSettings::default(), "old secret", 10).unwrap());
        (RootPasswordChange::new(Arc::clone(&host), 4), host)
    }

    #[tokio::test]
    async fn test_sentence_pending_until_challenge() {
        let (mut flow, _host) = flow();
        flow.set_sentence("anything");
        assert_eq!(flow.form().validity(RootField::Sentence), Validity::Pending);

        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let words = flow.new_challenge_with(&mut rng).to_vec();
        assert_eq!(words.len(), 4);
        assert_eq!(flow.words(), words.as_slice());
        assert_eq!(flow.form().validity(RootField::Sentence), Validity::Invalid);

        flow.set_sentence(&words.join("  ").to_uppercase());
        assert_eq!(flow.form().validity(RootField::Sentence), Validity::Valid);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let (mut flow, _host) = flow();
        flow.new_challenge();
        let err = flow.submit().unwrap_err();
        assert_eq!(err.fields, vec![RootField::OldPassword, RootField::Sentence]);
        assert!(!flow.status().in_progress);
    }

    #[tokio::test]
    async fn test_wrong_old_password_feedback() {
        let (mut flow, _host) = flow();
        let words = flow.new_challenge().to_vec();
        flow.set_old_password("not it");
        flow.set_sentence(&words.join(" "));

        flow.submit().unwrap().await.unwrap();
        assert_eq!(flow.status().last_error, Some(HostError::Authentication));
        assert_eq!(flow.feedback().as_deref(), Some("The current password is incorrect"));
    }

    #[tokio::test]
    async fn test_successful_change() {
        let (mut flow, host) = flow();
        let words = flow.new_challenge().to_vec();
        flow.set_old_password("old secret");
        flow.set_sentence(&words.join(" "));

        flow.submit().unwrap().await.unwrap();
        assert_eq!(flow.status().last_result, Some(()));
        assert_eq!(flow.feedback(), None);

        host.lock_vault();
        host.unlock(&words.join(" ")).unwrap();
    }
}
