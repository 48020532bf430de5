//! Trailing-edge debouncer owned by a single controller.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs an action once a quiet period has passed since the last trigger.
///
/// Each [`trigger`](Debouncer::trigger) aborts the previously scheduled
/// action and restarts the window. Dropping the debouncer cancels any
/// pending action.
///
/// Aborting only takes effect at an await point. An action that has
/// already woken may still run, so callers that need exactly-once
/// semantics check their own state when it does.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` after the window, replacing any pending action.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
