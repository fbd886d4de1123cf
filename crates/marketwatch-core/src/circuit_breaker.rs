//! Per-provider circuit breaker.
//!
//! After `failure_threshold` consecutive failures the breaker opens and every
//! call fails fast until `open_timeout` has passed on the injected clock. The
//! next call is then let through as the single probe while every other call
//! keeps failing fast: success closes the breaker, a failure reopens it
//! immediately. A probe that never reports back is replaced by a new one
//! after another `open_timeout`.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub open_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            open_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Closed { failures: u32 },
    Open { since: Instant, failures: u32 },
    HalfOpen { probe_since: Instant, failures: u32 },
}

impl Phase {
    const fn state(self) -> CircuitState {
        match self {
            Self::Closed { .. } => CircuitState::Closed,
            Self::Open { .. } => CircuitState::Open,
            Self::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }

    const fn failures(self) -> u32 {
        match self {
            Self::Closed { failures }
            | Self::Open { failures, .. }
            | Self::HalfOpen { failures, .. } => failures,
        }
    }
}

/// Shared by every symbol fetched from one provider, so a dead upstream
/// costs a tick at most `failure_threshold` real requests.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    clock: Arc<dyn Clock>,
    phase: Mutex<Phase>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default(), Arc::new(SystemClock))
    }
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            phase: Mutex::new(Phase::Closed { failures: 0 }),
        }
    }

    pub fn allow_request(&self) -> bool {
        let now = self.clock.now();
        let mut phase = self.lock();
        let current = *phase;
        match current {
            Phase::Open { since, failures } | Phase::HalfOpen { probe_since: since, failures }
                if now.saturating_duration_since(since) >= self.config.open_timeout =>
            {
                info!(failures, "circuit half-open; probing upstream");
                *phase = Phase::HalfOpen {
                    probe_since: now,
                    failures,
                };
                true
            }
            Phase::Open { .. } | Phase::HalfOpen { .. } => false,
            Phase::Closed { .. } => true,
        }
    }

    pub fn record_success(&self) {
        let mut phase = self.lock();
        if phase.state() != CircuitState::Closed {
            info!("circuit closed; upstream recovered");
        }
        *phase = Phase::Closed { failures: 0 };
    }

    pub fn record_failure(&self) {
        let now = self.clock.now();
        let mut phase = self.lock();
        let current = *phase;
        let failures = current.failures().saturating_add(1);

        *phase = match current {
            Phase::HalfOpen { .. } => {
                warn!(failures, "probe failed; circuit reopened");
                Phase::Open { since: now, failures }
            }
            Phase::Open { .. } => Phase::Open { since: now, failures },
            Phase::Closed { .. } if failures >= self.config.failure_threshold => {
                warn!(
                    failures,
                    open_secs = self.config.open_timeout.as_secs(),
                    "circuit opened"
                );
                Phase::Open { since: now, failures }
            }
            Phase::Closed { .. } => Phase::Closed { failures },
        };
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().failures()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Phase> {
        self.phase
            .lock()
            .expect("circuit breaker lock is not poisoned")
    }
}
