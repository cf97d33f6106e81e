// ── Cancellable one-shot timer ──
//
// Deferred action with supersession: scheduling cancels any previously
// scheduled action first, so at most one action per timer is ever pending.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A one-shot deferred action that can be cancelled and rescheduled.
///
/// Rescheduling supersedes: the prior pending action (if any) is aborted
/// before the new one is created. Dropping the timer cancels it.
pub(crate) struct OneShotTimer {
    handle: Option<JoinHandle<()>>,
}

impl OneShotTimer {
    pub(crate) fn new() -> Self {
        Self { handle: None }
    }

    /// Run `action` after `delay`, cancelling any previously scheduled run.
    pub(crate) fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Abort the pending action, if one is scheduled.
    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether an action is still pending.
    #[cfg(test)]
    pub(crate) fn is_scheduled(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for OneShotTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn fires_after_the_delay_not_before() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = OneShotTimer::new();

        let counter = Arc::clone(&fired);
        timer.schedule(Duration::from_secs(300), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        // Let the spawned task register its sleep before moving the clock.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_supersedes_previous_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = OneShotTimer::new();

        for _ in 0..5 {
            let counter = Arc::clone(&fired);
            timer.schedule(Duration::from_secs(60), async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(3600)).await;
        tokio::task::yield_now().await;

        // Only the last scheduled action runs.
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_the_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = OneShotTimer::new();

        let counter = Arc::clone(&fired);
        timer.schedule(Duration::from_secs(60), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        timer.cancel();
        assert!(!timer.is_scheduled());

        tokio::time::advance(Duration::from_secs(120)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_fires_immediately() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = OneShotTimer::new();

        let counter = Arc::clone(&fired);
        timer.schedule(Duration::ZERO, async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
