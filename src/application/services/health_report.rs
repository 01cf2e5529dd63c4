//! # Health Report
//!
//! Periodic breaker metrics logging.

use crate::application::services::breaker_registry::CircuitBreakerRegistry;

/// Logs one event per breaker plus a healthy/unhealthy summary.
pub fn log_breaker_metrics(registry: &CircuitBreakerRegistry) {
    for metrics in registry.get_all_metrics() {
        tracing::info!(
            vendor = %metrics.vendor,
            state = %metrics.state,
            failure_count = metrics.failure_count,
            success_count = metrics.success_count,
            total_calls = metrics.total_calls,
            total_failures = metrics.total_failures,
            failure_rate_percent = metrics.failure_rate_percent,
            time_in_state_secs = metrics.time_in_state_secs,
            last_failure = ?metrics.last_failure,
            "Circuit breaker metrics"
        );
    }

    let healthy = registry.get_healthy_vendors();
    let unhealthy = registry.get_unhealthy_vendors();
    if unhealthy.is_empty() {
        tracing::info!(healthy = healthy.len(), "All vendors healthy");
    } else {
        let names: Vec<&str> = unhealthy.iter().map(|v| v.as_str()).collect();
        tracing::warn!(
            healthy = healthy.len(),
            unhealthy = ?names,
            "Vendors with open circuit"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BreakerConfig;
    use crate::domain::value_objects::VendorId;

    #[test]
    fn logs_without_touching_breakers() {
        let registry = CircuitBreakerRegistry::new(BreakerConfig {
            failure_threshold: 1,
            cooldown_secs: 60,
        });
        registry.register(VendorId::new("VendorOne"));
        registry
            .register(VendorId::new("VendorTwo"))
            .record_failure();

        let before = registry.get_all_metrics();
        log_breaker_metrics(&registry);
        let after = registry.get_all_metrics();

        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.state, a.state);
            assert_eq!(b.total_calls, a.total_calls);
        }
        assert_eq!(registry.get_unhealthy_vendors().len(), 1);
    }
}
