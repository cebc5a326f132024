//! Wall-clock abstraction.
//!
//! History timestamps come from a [`Clock`] so tests can pin or step time
//! instead of racing the system clock.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of UTC timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Set the current time.
    pub fn set(&self, time: DateTime<Utc>) {
        *self.current.lock() = time;
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
