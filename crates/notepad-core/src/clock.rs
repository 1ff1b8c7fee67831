//! Wall-clock source for record timestamps and notification expiry.
//!
//! [`ManualClock`] only moves when told to, so ordering tests can pin exact
//! timestamps.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of Unix-millisecond timestamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        notepad_types::now_millis()
    }
}

/// A clock that advances only when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            millis: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, delta: u64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

/// Create a shared system clock.
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}
