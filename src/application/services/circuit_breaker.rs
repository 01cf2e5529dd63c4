//! # Circuit Breaker
//!
//! Per-vendor failure gate.
//!
//! ```text
//!            threshold consecutive failures
//!   closed ─────────────────────────────────▶ open
//!     ▲                                        │
//!     │ success                                │ cooldown elapsed since
//!     │                                        │ last failure (on can_execute)
//!     └──────────── half_open ◀────────────────┘
//!                      │
//!                      └── any failure ──▶ open
//! ```
//!
//! All state lives behind one mutex so interleaved calls from concurrent
//! aggregations see a consistent counter and state.

use crate::config::BreakerConfig;
use crate::domain::value_objects::{BreakerState, Timestamp, VendorId};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Snapshot of a breaker for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakerMetrics {
    /// Vendor guarded by the breaker.
    pub vendor: VendorId,
    /// Current state.
    pub state: BreakerState,
    /// Consecutive failures since the last success or close.
    pub failure_count: u32,
    /// Successes recorded since creation or reset.
    pub success_count: u64,
    /// Calls admitted or rejected by `can_execute`.
    pub total_calls: u64,
    /// Failures recorded since creation or reset.
    pub total_failures: u64,
    /// `total_failures / total_calls * 100`, rounded to two decimals.
    pub failure_rate_percent: f64,
    /// Seconds spent in the current state, rounded to two decimals.
    pub time_in_state_secs: f64,
    /// Wall-clock time of the last recorded failure.
    pub last_failure: Option<Timestamp>,
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    failure_count: u32,
    success_count: u64,
    total_calls: u64,
    total_failures: u64,
    last_failure_at: Option<Instant>,
    last_failure_wall: Option<Timestamp>,
    last_state_change: Instant,
}

impl BreakerInner {
    fn new() -> Self {
        Self {
            state: BreakerState::Closed,
            failure_count: 0,
            success_count: 0,
            total_calls: 0,
            total_failures: 0,
            last_failure_at: None,
            last_failure_wall: None,
            last_state_change: Instant::now(),
        }
    }

    fn transition(&mut self, to: BreakerState) {
        self.state = to;
        self.last_state_change = Instant::now();
        if to == BreakerState::Closed {
            self.failure_count = 0;
        }
    }
}

/// Circuit breaker for a single vendor.
pub struct CircuitBreaker {
    vendor_id: VendorId,
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Creates a closed breaker with zeroed counters.
    #[must_use]
    pub fn new(vendor_id: VendorId, config: &BreakerConfig) -> Self {
        tracing::info!(vendor = %vendor_id, "Circuit breaker initialized");
        Self {
            vendor_id,
            failure_threshold: config.failure_threshold.max(1),
            cooldown: config.cooldown(),
            inner: Mutex::new(BreakerInner::new()),
        }
    }

    /// Returns the guarded vendor.
    #[inline]
    #[must_use]
    pub fn vendor_id(&self) -> &VendorId {
        &self.vendor_id
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> BreakerState {
        self.inner.lock().state
    }

    /// Returns true if a call to the vendor may proceed.
    ///
    /// An open breaker whose cooldown has elapsed since the last failure
    /// moves to `half_open` and admits the call.
    pub fn can_execute(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.total_calls = inner.total_calls.saturating_add(1);

        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open => {
                let cooled_down = inner
                    .last_failure_at
                    .is_some_and(|at| at.elapsed() >= self.cooldown);
                if cooled_down {
                    inner.transition(BreakerState::HalfOpen);
                    tracing::info!(
                        vendor = %self.vendor_id,
                        "Circuit breaker half-open, cooldown expired"
                    );
                    true
                } else {
                    tracing::debug!(vendor = %self.vendor_id, "Circuit breaker open, blocking call");
                    false
                }
            }
            BreakerState::HalfOpen => {
                tracing::debug!(vendor = %self.vendor_id, "Circuit breaker half-open, allowing probe");
                true
            }
        }
    }

    /// Records a successful call.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.success_count = inner.success_count.saturating_add(1);

        match inner.state {
            BreakerState::HalfOpen | BreakerState::Open => {
                inner.transition(BreakerState::Closed);
                tracing::info!(vendor = %self.vendor_id, "Circuit breaker closed after success");
            }
            BreakerState::Closed => {
                if inner.failure_count > 0 {
                    tracing::debug!(
                        vendor = %self.vendor_id,
                        failures = inner.failure_count,
                        "Resetting failure count after success"
                    );
                }
                inner.failure_count = 0;
            }
        }
    }

    /// Records a failed call.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.total_failures = inner.total_failures.saturating_add(1);
        inner.last_failure_at = Some(Instant::now());
        inner.last_failure_wall = Some(Timestamp::now());

        match inner.state {
            BreakerState::HalfOpen => {
                inner.transition(BreakerState::Open);
                tracing::warn!(vendor = %self.vendor_id, "Circuit breaker reopened, probe failed");
            }
            BreakerState::Closed if inner.failure_count >= self.failure_threshold => {
                inner.transition(BreakerState::Open);
                tracing::warn!(
                    vendor = %self.vendor_id,
                    failures = inner.failure_count,
                    threshold = self.failure_threshold,
                    "Circuit breaker opened"
                );
            }
            BreakerState::Closed => {
                tracing::debug!(
                    vendor = %self.vendor_id,
                    failures = inner.failure_count,
                    threshold = self.failure_threshold,
                    "Failure recorded"
                );
            }
            BreakerState::Open => {}
        }
    }

    /// Returns a snapshot of state and counters.
    #[must_use]
    pub fn get_metrics(&self) -> BreakerMetrics {
        let inner = self.inner.lock();
        let failure_rate = if inner.total_calls > 0 {
            inner.total_failures as f64 / inner.total_calls as f64 * 100.0
        } else {
            0.0
        };

        BreakerMetrics {
            vendor: self.vendor_id.clone(),
            state: inner.state,
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            total_calls: inner.total_calls,
            total_failures: inner.total_failures,
            failure_rate_percent: round2(failure_rate),
            time_in_state_secs: round2(inner.last_state_change.elapsed().as_secs_f64()),
            last_failure: inner.last_failure_wall,
        }
    }

    /// Forces the breaker back to its initial state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        *inner = BreakerInner::new();
        tracing::warn!(vendor = %self.vendor_id, "Circuit breaker manually reset");
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CircuitBreaker")
            .field("vendor_id", &self.vendor_id)
            .field("state", &inner.state)
            .field("failures", &inner.failure_count)
            .finish()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn breaker(threshold: u32, cooldown_secs: u64) -> CircuitBreaker {
        CircuitBreaker::new(
            VendorId::new("VendorOne"),
            &BreakerConfig {
                failure_threshold: threshold,
                cooldown_secs,
            },
        )
    }

    fn open_breaker() -> CircuitBreaker {
        let breaker = breaker(3, 60);
        for _ in 0..3 {
            breaker.record_failure();
        }
        breaker
    }

    mod closed {
        use super::*;

        #[test]
        fn starts_closed() {
            let breaker = breaker(5, 60);
            assert_eq!(breaker.state(), BreakerState::Closed);
            assert!(breaker.can_execute());
        }

        #[test]
        fn opens_at_threshold() {
            let breaker = breaker(3, 60);
            breaker.record_failure();
            breaker.record_failure();
            assert!(breaker.can_execute());
            assert_eq!(breaker.state(), BreakerState::Closed);

            breaker.record_failure();
            assert_eq!(breaker.state(), BreakerState::Open);
            assert!(!breaker.can_execute());
        }

        #[test]
        fn success_resets_consecutive_failures() {
            let breaker = breaker(3, 60);
            breaker.record_failure();
            breaker.record_failure();
            breaker.record_success();
            breaker.record_failure();
            breaker.record_failure();
            assert_eq!(breaker.state(), BreakerState::Closed);
            assert_eq!(breaker.get_metrics().failure_count, 2);
        }
    }

    mod recovery {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn stays_open_during_cooldown() {
            let breaker = open_breaker();
            tokio::time::advance(Duration::from_secs(59)).await;
            assert!(!breaker.can_execute());
            assert_eq!(breaker.state(), BreakerState::Open);
        }

        #[tokio::test(start_paused = true)]
        async fn half_opens_after_cooldown_then_closes_on_success() {
            let breaker = open_breaker();
            tokio::time::advance(Duration::from_secs(60)).await;

            assert!(breaker.can_execute());
            assert_eq!(breaker.state(), BreakerState::HalfOpen);
            assert!(breaker.can_execute());
            assert_eq!(breaker.state(), BreakerState::HalfOpen);

            breaker.record_success();
            assert_eq!(breaker.state(), BreakerState::Closed);
            assert_eq!(breaker.get_metrics().failure_count, 0);
        }

        #[tokio::test(start_paused = true)]
        async fn single_probe_failure_reopens() {
            let breaker = open_breaker();
            breaker.record_success();
            assert_eq!(breaker.state(), BreakerState::Closed);
            for _ in 0..3 {
                breaker.record_failure();
            }
            tokio::time::advance(Duration::from_secs(60)).await;
            assert!(breaker.can_execute());

            breaker.record_failure();
            assert_eq!(breaker.state(), BreakerState::Open);
            assert!(!breaker.can_execute());
        }

        #[tokio::test(start_paused = true)]
        async fn cooldown_restarts_from_latest_failure() {
            let breaker = open_breaker();
            tokio::time::advance(Duration::from_secs(30)).await;
            breaker.record_failure();
            tokio::time::advance(Duration::from_secs(45)).await;
            assert!(!breaker.can_execute());
            tokio::time::advance(Duration::from_secs(15)).await;
            assert!(breaker.can_execute());
        }

        #[test]
        fn success_while_open_closes() {
            let breaker = open_breaker();
            breaker.record_success();
            assert_eq!(breaker.state(), BreakerState::Closed);
        }
    }

    mod metrics {
        use super::*;

        #[test]
        fn counts_calls_and_failures() {
            let breaker = breaker(10, 60);
            for _ in 0..4 {
                assert!(breaker.can_execute());
            }
            breaker.record_failure();
            breaker.record_success();

            let metrics = breaker.get_metrics();
            assert_eq!(metrics.total_calls, 4);
            assert_eq!(metrics.total_failures, 1);
            assert_eq!(metrics.success_count, 1);
            assert_eq!(metrics.failure_rate_percent, 25.0);
            assert!(metrics.last_failure.is_some());
        }

        #[test]
        fn metrics_are_side_effect_free() {
            let breaker = breaker(10, 60);
            let before = breaker.get_metrics();
            let after = breaker.get_metrics();
            assert_eq!(before.total_calls, after.total_calls);
            assert_eq!(after.total_calls, 0);
            assert_eq!(after.failure_rate_percent, 0.0);
        }

        #[tokio::test(start_paused = true)]
        async fn time_in_state_tracks_transitions() {
            let breaker = breaker(1, 60);
            tokio::time::advance(Duration::from_secs(10)).await;
            assert_eq!(breaker.get_metrics().time_in_state_secs, 10.0);

            breaker.record_failure();
            assert_eq!(breaker.get_metrics().time_in_state_secs, 0.0);
        }

        #[test]
        fn serializes_state_in_snake_case() {
            let json = serde_json::to_value(open_breaker().get_metrics()).unwrap();
            assert_eq!(json["state"], "open");
            assert_eq!(json["vendor"], "VendorOne");
        }
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let breaker = open_breaker();
        breaker.reset();

        let metrics = breaker.get_metrics();
        assert_eq!(metrics.state, BreakerState::Closed);
        assert_eq!(metrics.failure_count, 0);
        assert_eq!(metrics.total_calls, 0);
        assert_eq!(metrics.total_failures, 0);
        assert!(metrics.last_failure.is_none());
        assert!(breaker.can_execute());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_failures_are_all_counted() {
        let breaker = Arc::new(breaker(1000, 60));
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let breaker = Arc::clone(&breaker);
                tokio::spawn(async move {
                    for _ in 0..50 {
                        breaker.record_failure();
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let metrics = breaker.get_metrics();
        assert_eq!(metrics.total_failures, 400);
        assert_eq!(metrics.failure_count, 400);
        assert_eq!(metrics.state, BreakerState::Closed);
    }
}
