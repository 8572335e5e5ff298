//! A cancel-and-restart timer for deferring text-query re-evaluation.
//!
//! Each keystroke invalidates any pending evaluation and schedules a fresh
//! one, so only the final query state after a typing pause is ever evaluated.
//! The delay is fixed configuration; it affects update latency, never
//! correctness.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

/// The fixed delay between the last keystroke and query re-evaluation.
pub const QUERY_DEBOUNCE: Duration = Duration::from_millis(150);

/// Schedules a single deferred task at a time. Scheduling again before the
/// delay elapses aborts the pending task and restarts the clock.
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

    /// Aborts any pending task and schedules `task` to run after the delay.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        trace!("Scheduling deferred task in {delay:?}");
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            task();
        }));
    }

    /// Aborts the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a task is scheduled and has not yet fired or been canceled.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let reader = count.clone();
        (count, move || reader.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_fires_once_after_delay() {
        let (count, read) = counter();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(move || {
            count.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(read(), 0);
        sleep(Duration::from_millis(50)).await;
        assert_eq!(read(), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_reschedule_cancels_prior_task() {
        let (count, read) = counter();
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        for _ in 0..5 {
            let count = count.clone();
            debouncer.schedule(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(5)).await;
        }
        sleep(Duration::from_millis(60)).await;
        // Only the final scheduled task fires.
        assert_eq!(read(), 1);
    }

    #[tokio::test]
    async fn test_cancel_prevents_firing() {
        let (count, read) = counter();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(move || {
            count.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(read(), 0);
        assert!(!debouncer.is_pending());
    }
}
