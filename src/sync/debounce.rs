// src/sync/debounce.rs
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::host::HostError;

/// Async callback that hands a settled draft to the remote owner.
pub type CommitFn<T> = Arc<dyn Fn(T) -> BoxFuture<'static, Result<(), HostError>> + Send + Sync>;

struct Inner<T> {
    draft: T,
    remote: T,
    edit_epoch: u64,
    // Epoch of the newest commit the remote owner accepted
    applied_epoch: u64,
    timer: Option<JoinHandle<()>>,
    in_flight: usize,
    commits_sent: u64,
    last_commit_error: Option<HostError>,
}

/// Local draft of a remotely owned value with debounced commits.
///
/// Edits land in the draft immediately. Once no edit has happened for the
/// quiet period, the draft as it is at that moment is committed. Remote
/// updates replace the draft only while nothing local is pending. A
/// successful commit becomes the remote value, so once nothing is pending
/// the draft and the remote value agree unless the last commit failed.
pub struct DebouncedState<T> {
    inner: Arc<Mutex<Inner<T>>>,
    quiet_period: Duration,
    commit: CommitFn<T>,
}

impl<T> Clone for DebouncedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            quiet_period: self.quiet_period,
            commit: Arc::clone(&self.commit),
        }
    }
}

impl<T> DebouncedState<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(remote: T, quiet_period: Duration, commit: CommitFn<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                draft: remote.clone(),
                remote,
                edit_epoch: 0,
                applied_epoch: 0,
                timer: None,
                in_flight: 0,
                commits_sent: 0,
                last_commit_error: None,
            })),
            quiet_period,
            commit,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> T {
        self.lock().draft.clone()
    }

    pub fn remote(&self) -> T {
        self.lock().remote.clone()
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// True while a quiet-period timer is running or a commit is in flight.
    pub fn is_pending(&self) -> bool {
        let inner = self.lock();
        inner.timer.is_some() || inner.in_flight > 0
    }

    pub fn commits_sent(&self) -> u64 {
        self.lock().commits_sent
    }

    pub fn last_commit_error(&self) -> Option<HostError> {
        self.lock().last_commit_error.clone()
    }

    /// Update the draft and restart the quiet period.
    pub fn set_local(&self, value: T) {
        let mut inner = self.lock();
        inner.draft = value;
        inner.edit_epoch += 1;

        // Replace, never stack
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }

        let epoch = inner.edit_epoch;
        let state = self.clone();
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(state.quiet_period).await;
            state.commit_settled(epoch).await;
        }));
    }

    /// Apply the editing closure to the current draft.
    pub fn update_local<F>(&self, edit: F)
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.current();
        edit(&mut value);
        self.set_local(value);
    }

    async fn commit_settled(&self, epoch: u64) {
        let value = {
            let mut inner = self.lock();
            if inner.edit_epoch != epoch {
                return;
            }
            // From here on later edits start their own timer and leave this commit alone
            inner.timer = None;
            inner.in_flight += 1;
            inner.commits_sent += 1;
            inner.draft.clone()
        };

        log::debug!("Quiet period elapsed, committing draft (epoch {})", epoch);
        let result = (self.commit)(value.clone()).await;

        let mut inner = self.lock();
        inner.in_flight -= 1;
        match result {
            Ok(()) => {
                inner.last_commit_error = None;
                // An older commit finishing late must not roll the remote value back
                if epoch >= inner.applied_epoch {
                    inner.applied_epoch = epoch;
                    inner.remote = value;
                }
            }
            Err(e) => {
                log::warn!("Commit of draft failed: {}", e);
                inner.last_commit_error = Some(e);
            }
        }
    }

    /// Record an authoritative value pushed by the remote owner.
    pub fn on_external_update(&self, value: T) {
        let mut inner = self.lock();
        inner.remote = value.clone();
        if inner.timer.is_none() && inner.in_flight == 0 {
            inner.draft = value;
        } else {
            log::debug!("Remote update received while a local edit is pending; keeping draft");
        }
    }
}
