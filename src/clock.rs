//! Monotonic time source used for request/operation timestamps.
//!
//! The core only ever compares and subtracts timestamps; it never reads a
//! wall-clock date. Keeping the clock behind a trait lets tests drive exact
//! timestamp sequences instead of racing `SystemTime::now()`.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary but monotonically non-decreasing epoch.
    fn now_ms(&self) -> i64;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Deterministic clock for tests: starts at an arbitrary instant and only
/// advances when told to, so timestamp ordering assertions are exact.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct FakeClock {
    millis: Arc<AtomicI64>,
}

#[cfg(any(test, feature = "test-util"))]
impl FakeClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Advance the clock and return the new value.
    pub fn advance(&self, by_ms: i64) -> i64 {
        self.millis.fetch_add(by_ms, Ordering::SeqCst) + by_ms
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        self.millis.fetch_add(1, Ordering::SeqCst)
    }
}
