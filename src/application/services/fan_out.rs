//! # Fan-out Coordinator
//!
//! Queries every vendor for a product key concurrently and collects the
//! quotes that arrived. Each vendor call runs through the [`RetryExecutor`]
//! under that vendor's circuit breaker.
//!
//! Calls are polled together on the caller's task; dropping the returned
//! future abandons all of them.

use crate::application::error::ApplicationResult;
use crate::application::services::breaker_registry::CircuitBreakerRegistry;
use crate::application::services::circuit_breaker::CircuitBreaker;
use crate::application::services::retry::{CallFailure, CallOutcome, RetryExecutor, RetryPolicy};
use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{ProductKey, VendorId};
use crate::infrastructure::vendors::traits::VendorGateway;
use futures::future::join_all;
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct VendorSlot {
    gateway: Arc<dyn VendorGateway>,
    breaker: Arc<CircuitBreaker>,
}

/// Concurrent multi-vendor query.
#[derive(Debug, Clone)]
pub struct FanOutCoordinator {
    vendors: Vec<VendorSlot>,
    executor: RetryExecutor,
}

impl FanOutCoordinator {
    /// Creates a coordinator over `gateways`, using breakers from `registry`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::BreakerNotRegistered` if a gateway's
    /// vendor has no breaker in `registry`.
    pub fn new(
        gateways: Vec<Arc<dyn VendorGateway>>,
        registry: &CircuitBreakerRegistry,
        policy: RetryPolicy,
    ) -> ApplicationResult<Self> {
        let vendors = gateways
            .into_iter()
            .map(|gateway| {
                let breaker = registry.get_breaker(gateway.vendor_id())?;
                Ok(VendorSlot { gateway, breaker })
            })
            .collect::<ApplicationResult<Vec<_>>>()?;

        Ok(Self {
            vendors,
            executor: RetryExecutor::new(policy),
        })
    }

    /// Returns the vendors queried, in configuration order.
    #[must_use]
    pub fn vendors(&self) -> Vec<VendorId> {
        self.vendors
            .iter()
            .map(|slot| slot.gateway.vendor_id().clone())
            .collect()
    }

    /// Queries all vendors for `key` and returns the quotes received.
    ///
    /// Failed, skipped and "not found" vendors contribute nothing. Quotes
    /// are returned in vendor configuration order.
    pub async fn collect(&self, key: &ProductKey) -> Vec<Quote> {
        let started = Instant::now();

        let calls = self.vendors.iter().map(|slot| {
            self.executor
                .execute(slot.gateway.as_ref(), slot.breaker.as_ref(), key)
        });
        let outcomes = join_all(calls).await;

        let mut quotes = Vec::with_capacity(outcomes.len());
        let mut not_found = 0usize;
        let mut failed = 0usize;
        let mut skipped = 0usize;
        for outcome in outcomes {
            match outcome {
                CallOutcome::Found(quote) => quotes.push(quote),
                CallOutcome::NotFound => not_found += 1,
                CallOutcome::Failed(CallFailure::CircuitOpen) => skipped += 1,
                CallOutcome::Failed(CallFailure::MaxRetriesExceeded { .. }) => failed += 1,
            }
        }

        tracing::info!(
            key = %key,
            queried = self.vendors.len(),
            succeeded = quotes.len(),
            not_found,
            failed,
            skipped,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Vendor fan-out complete"
        );

        quotes
    }
}
