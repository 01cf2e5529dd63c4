//! # Circuit Breaker Registry
//!
//! Owns one [`CircuitBreaker`] per vendor and answers aggregate health
//! queries for the metrics job.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::circuit_breaker::{BreakerMetrics, CircuitBreaker};
use crate::config::BreakerConfig;
use crate::domain::value_objects::{BreakerState, VendorId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of per-vendor circuit breakers.
///
/// Breakers are created once and never replaced or removed.
#[derive(Debug)]
pub struct CircuitBreakerRegistry {
    config: BreakerConfig,
    breakers: RwLock<BTreeMap<VendorId, Arc<CircuitBreaker>>>,
}

impl CircuitBreakerRegistry {
    /// Creates an empty registry; breakers it creates use `config`.
    #[must_use]
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            breakers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Registers a breaker for `vendor_id`.
    ///
    /// Registering an existing vendor returns its breaker unchanged.
    pub fn register(&self, vendor_id: VendorId) -> Arc<CircuitBreaker> {
        let mut breakers = self.breakers.write();
        if let Some(existing) = breakers.get(&vendor_id) {
            tracing::warn!(vendor = %vendor_id, "Circuit breaker already registered");
            return Arc::clone(existing);
        }

        let breaker = Arc::new(CircuitBreaker::new(vendor_id.clone(), &self.config));
        breakers.insert(vendor_id, Arc::clone(&breaker));
        breaker
    }

    /// Returns the breaker for `vendor_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::BreakerNotRegistered` if the vendor was
    /// never registered.
    pub fn get_breaker(&self, vendor_id: &VendorId) -> ApplicationResult<Arc<CircuitBreaker>> {
        self.breakers
            .read()
            .get(vendor_id)
            .cloned()
            .ok_or_else(|| ApplicationError::breaker_not_registered(vendor_id.clone()))
    }

    /// Returns the registered vendors in name order.
    #[must_use]
    pub fn vendors(&self) -> Vec<VendorId> {
        self.breakers.read().keys().cloned().collect()
    }

    /// Returns the number of registered breakers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.breakers.read().len()
    }

    /// Returns true if no breaker is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breakers.read().is_empty()
    }

    /// Returns metrics for every breaker, in vendor name order.
    #[must_use]
    pub fn get_all_metrics(&self) -> Vec<BreakerMetrics> {
        self.breakers
            .read()
            .values()
            .map(|breaker| breaker.get_metrics())
            .collect()
    }

    /// Returns vendors whose breaker is closed.
    #[must_use]
    pub fn get_healthy_vendors(&self) -> Vec<VendorId> {
        self.vendors_in(BreakerState::Closed)
    }

    /// Returns vendors whose breaker is open.
    #[must_use]
    pub fn get_unhealthy_vendors(&self) -> Vec<VendorId> {
        self.vendors_in(BreakerState::Open)
    }

    /// Resets every breaker to its initial state.
    pub fn reset_all(&self) {
        let breakers = self.breakers.read();
        for breaker in breakers.values() {
            breaker.reset();
        }
        tracing::warn!(count = breakers.len(), "All circuit breakers reset");
    }

    fn vendors_in(&self, state: BreakerState) -> Vec<VendorId> {
        self.breakers
            .read()
            .iter()
            .filter(|(_, breaker)| breaker.state() == state)
            .map(|(vendor, _)| vendor.clone())
            .collect()
    }
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}
