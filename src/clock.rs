//! Injected clock so time-dependent logic stays testable.
//!
//! Classifier, urgency, and the transition engine take `now` as a plain
//! parameter; the board holds a `Clock` and passes it through. Nothing in
//! this crate reads system time directly except `SystemClock`.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl FixedClock {
    /// Convenience: a shared handle for board construction.
    pub fn shared(at: DateTime<Utc>) -> Arc<dyn Clock> {
        Arc::new(FixedClock(at))
    }
}
