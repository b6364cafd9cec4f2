//! Wall-clock abstraction for drift-free elapsed-time math
//!
//! The session manager never counts seconds by itself; it anchors on a
//! resume timestamp and recomputes elapsed time from `now`. Injecting the
//! clock keeps that arithmetic testable without sleeping.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

/// Source of milliseconds since the Unix epoch
pub trait Clock: Send {
    fn now_millis(&self) -> i64;
}

/// Real wall clock backed by chrono
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually advanced clock for tests and embedding
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and hand another to the session manager.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_millis: i64) {
        self.millis.fetch_add(delta_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
