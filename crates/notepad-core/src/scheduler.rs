//! Debounce and interval timers on the tokio runtime.
//!
//! Timers are tokio tasks tracked by [`TimerHandle`]. Cancelling stops
//! future runs only; a run that has already started always completes.
//! A one-shot timer leaves the pending set the moment it fires, and an
//! interval runs each tick on its own detached task, so aborting the
//! ticker never interrupts a write. Dropping the [`Scheduler`] cancels
//! everything still pending.
//!
//! Under `#[tokio::test(start_paused = true)]` the runtime clock is
//! virtual, which makes timer behaviour deterministic in tests.
//!
//! All `schedule_*` calls must happen inside a tokio runtime.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{trace, warn};

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

type TimerMap = Arc<Mutex<HashMap<TimerHandle, AbortHandle>>>;

/// Owns a set of pending timers.
#[derive(Default)]
pub struct Scheduler {
    timers: TimerMap,
    next_id: AtomicU64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&self) -> TimerHandle {
        TimerHandle(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Run `task` once after `delay`.
    pub fn schedule_debounced<F, Fut>(&self, delay: Duration, task: F) -> TimerHandle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = self.next_handle();
        let timers = Arc::clone(&self.timers);

        // Hold the map while spawning so the task cannot finish before it is registered.
        let mut pending = self.timers.lock();
        let join = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            timers.lock().remove(&handle);
            trace!(?handle, "debounced timer fired");
            task().await;
        });
        pending.insert(handle, join.abort_handle());
        handle
    }

    /// Run `task` every `period`, first after one full period. Each run
    /// completes before the next tick is awaited, and outlives a cancel
    /// that lands while it is in flight.
    pub fn schedule_interval<F, Fut>(&self, period: Duration, mut task: F) -> TimerHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = self.next_handle();
        let period = period.max(Duration::from_millis(1));

        let mut pending = self.timers.lock();
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                trace!(?handle, "interval tick");
                if let Err(e) = tokio::spawn(task()).await {
                    warn!(?handle, error = %e, "interval run failed");
                }
            }
        });
        pending.insert(handle, join.abort_handle());
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// never scheduled here.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        match self.timers.lock().remove(&handle) {
            Some(abort) => {
                abort.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&self) {
        for (_, abort) in self.timers.lock().drain() {
            abort.abort();
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.lock().contains_key(&handle)
    }

    /// Number of timers that have not fired (intervals never do).
    pub fn pending(&self) -> usize {
        self.timers.lock().len()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn bump(c: &Arc<AtomicUsize>) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        let c = Arc::clone(c);
        move || {
            c.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_fires_after_delay() {
        let scheduler = Scheduler::new();
        let hits = counter();
        let handle = scheduler.schedule_debounced(Duration::from_millis(1000), bump(&hits));
        assert!(scheduler.is_pending(handle));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending(handle));
        assert!(!scheduler.cancel(handle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let scheduler = Scheduler::new();
        let hits = counter();
        let handle = scheduler.schedule_debounced(Duration::from_millis(50), bump(&hits));
        assert!(scheduler.cancel(handle));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_repeats_until_cancelled() {
        let scheduler = Scheduler::new();
        let hits = counter();
        let c = Arc::clone(&hits);
        let handle = scheduler.schedule_interval(Duration::from_secs(10), move || {
            c.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        });

        tokio::time::sleep(Duration::from_millis(9_999)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(25_001)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        assert!(scheduler.cancel(handle));
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_lets_in_flight_interval_run_finish() {
        let scheduler = Scheduler::new();
        let started = counter();
        let finished = counter();
        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));
        let handle = scheduler.schedule_interval(Duration::from_secs(10), move || {
            let (s, f) = (Arc::clone(&s), Arc::clone(&f));
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5)).await;
                f.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        assert!(scheduler.cancel(handle));
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let hits = counter();
        {
            let scheduler = Scheduler::new();
            scheduler.schedule_debounced(Duration::from_millis(10), bump(&hits));
            scheduler.schedule_interval(Duration::from_millis(10), {
                let c = Arc::clone(&hits);
                move || {
                    c.fetch_add(1, Ordering::SeqCst);
                    std::future::ready(())
                }
            });
            assert_eq!(scheduler.pending(), 2);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handles_are_distinct() {
        let scheduler = Scheduler::new();
        let a = scheduler.schedule_debounced(Duration::from_secs(1), || async {});
        let b = scheduler.schedule_debounced(Duration::from_secs(1), || async {});
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), 2);
    }
}
