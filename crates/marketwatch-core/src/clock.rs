//! Time sources.
//!
//! The cache TTL and the circuit breaker read the monotonic [`Clock::now`];
//! the market session gate and snapshot stamps read [`Clock::now_utc`].
//! Production code uses [`SystemClock`]. Tests drive a [`ManualClock`] so
//! expiry can be exercised without waiting.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use time::OffsetDateTime;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    fn now_utc(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when [`ManualClock::advance`] is called.
#[derive(Debug)]
pub struct ManualClock {
    base_instant: Instant,
    base_utc: OffsetDateTime,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new(start_utc: OffsetDateTime) -> Self {
        Self {
            base_instant: Instant::now(),
            base_utc: start_utc,
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut elapsed = self
            .elapsed
            .lock()
            .expect("manual clock lock is not poisoned");
        *elapsed += by;
    }

    fn elapsed(&self) -> Duration {
        *self
            .elapsed
            .lock()
            .expect("manual clock lock is not poisoned")
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(OffsetDateTime::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base_instant + self.elapsed()
    }

    fn now_utc(&self) -> OffsetDateTime {
        self.base_utc + self.elapsed()
    }
}
