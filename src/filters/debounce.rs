//! Component-owned debounce timer

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Holds at most one pending delayed action.
///
/// Scheduling replaces (and cancels) the previous pending action. Once the
/// delay has elapsed the action is detached onto its own task; it still
/// does not run if a reschedule or cancel lands before it starts, but once
/// running it cannot be stopped. Dropping the debouncer cancels whatever is
/// pending.
#[derive(Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Bumped by every schedule and cancel; a fired action only runs while
    /// its own value is still current
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` unless rescheduled or cancelled first
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(async move {
                if current.load(Ordering::SeqCst) == generation {
                    action.await;
                }
            });
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancel the pending action. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match pending {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
