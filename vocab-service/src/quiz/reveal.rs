//! Cancellable delayed reveal.
//!
//! Each schedule bumps an epoch and aborts the previous task. The timer
//! compares its ticket with the epoch inside the watch channel's write lock,
//! and cancellation bumps the epoch under that same lock, so a superseded
//! timer can never touch the state after a newer action has run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct RevealTimer<S> {
    target: Arc<watch::Sender<S>>,
    epoch: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl<S> RevealTimer<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(target: Arc<watch::Sender<S>>) -> Self {
        Self {
            target,
            epoch: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// Invalidate the pending reveal, if any.
    pub fn cancel(&mut self) {
        let epoch = &self.epoch;
        self.target.send_if_modified(|_| {
            epoch.fetch_add(1, Ordering::SeqCst);
            false
        });

        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Run `apply` on the state after `delay`, superseding any earlier schedule.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, apply: F)
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.cancel();

        let ticket = self.epoch.load(Ordering::SeqCst);
        let epoch = Arc::clone(&self.epoch);
        let target = Arc::clone(&self.target);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            target.send_if_modified(|state| {
                if epoch.load(Ordering::SeqCst) != ticket {
                    tracing::trace!(ticket, "Discarding stale reveal");
                    return false;
                }
                apply(state);
                true
            });
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<S> Drop for RevealTimer<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
