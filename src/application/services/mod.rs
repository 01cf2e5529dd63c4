//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`CircuitBreaker`] and [`CircuitBreakerRegistry`]: per-vendor failure isolation
//! - [`RetryExecutor`]: timeout and bounded backoff around one vendor call
//! - [`FanOutCoordinator`]: concurrent query of all vendors
//! - [`AggregationService`]: cache, fan-out, freshness and selection

pub mod aggregation;
pub mod breaker_registry;
pub mod circuit_breaker;
pub mod fan_out;
pub mod health_report;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregation::{AggregationService, CacheStats};
pub use breaker_registry::CircuitBreakerRegistry;
pub use circuit_breaker::{BreakerMetrics, CircuitBreaker};
pub use fan_out::FanOutCoordinator;
pub use health_report::log_breaker_metrics;
pub use retry::{CallFailure, CallOutcome, RetryExecutor, RetryPolicy};
