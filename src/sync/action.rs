// src/sync/action.rs
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

/// Observable state of a tracked action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionState<T, E> {
    pub in_progress: bool,
    pub last_result: Option<T>,
    pub last_error: Option<E>,
}

impl<T, E> Default for ActionState<T, E> {
    fn default() -> Self {
        Self {
            in_progress: false,
            last_result: None,
            last_error: None,
        }
    }
}

struct Inner<T, E> {
    state: ActionState<T, E>,
    generation: u64,
}

/// Tracks the latest invocation of an async action.
///
/// Every `invoke` bumps a generation counter. A completion only writes the
/// state when its captured generation is still the latest, so an older call
/// finishing late can never overwrite a newer one. Superseded calls keep
/// running; their output is simply dropped.
pub struct ActionTracker<T, E> {
    inner: Arc<Mutex<Inner<T, E>>>,
}

impl<T, E> Clone for ActionTracker<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Default for ActionTracker<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> ActionTracker<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ActionState::default(),
                generation: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T, E>> {
        // A poisoned lock only means a panic elsewhere; the state itself is plain data
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start `action`, superseding any call still in flight.
    ///
    /// The returned handle may be dropped; that does not cancel the action.
    pub fn invoke<F>(&self, action: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state.in_progress = true;
            inner.generation
        };
        log::debug!("Action invoked (generation {})", generation);

        let tracker = self.clone();
        tokio::spawn(async move {
            let outcome = action.await;
            tracker.complete(generation, outcome);
        })
    }

    fn complete(&self, generation: u64, outcome: Result<T, E>) {
        let mut inner = self.lock();
        if inner.generation != generation {
            log::debug!(
                "Discarding stale completion (generation {}, latest {})",
                generation,
                inner.generation
            );
            return;
        }

        match outcome {
            Ok(result) => {
                inner.state.last_result = Some(result);
                inner.state.last_error = None;
            }
            Err(error) => {
                inner.state.last_error = Some(error);
            }
        }
        inner.state.in_progress = false;
    }

    /// Clear the displayed result and error. Does not cancel anything.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state.last_result = None;
        inner.state.last_error = None;
    }

    pub fn snapshot(&self) -> ActionState<T, E> {
        self.lock().state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}
