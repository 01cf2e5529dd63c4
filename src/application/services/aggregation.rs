//! # Aggregation Service
//!
//! Entry point for resolving a product key into one [`AggregateResult`].
//!
//! # Flow
//!
//! 1. Read the cache; a hit is returned without contacting any vendor
//! 2. On a miss, fan out to all vendors
//! 3. Drop stale quotes, then apply the selection policy
//! 4. Cache and return the selected result, or return an uncached
//!    out-of-stock result when nothing was selected
//!
//! Cache failures never fail a request: reads degrade to a miss and writes
//! are skipped, both with a warning. Every cache operation is bounded by a
//! timeout, so a stalled store counts as a failed one.

use crate::application::services::breaker_registry::CircuitBreakerRegistry;
use crate::application::services::fan_out::FanOutCoordinator;
use crate::domain::entities::aggregate_result::AggregateResult;
use crate::domain::services::freshness::FreshnessFilter;
use crate::domain::services::selection::QuoteSelector;
use crate::domain::value_objects::{ProductKey, Timestamp};
use crate::infrastructure::cache::traits::{CacheError, CacheResult, CacheStore};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default bound on a single cache operation.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(250);

/// Cache hit/miss counters since startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that went to the vendors.
    pub misses: u64,
    /// `hits / (hits + misses) * 100`, or 0 before the first lookup.
    pub hit_rate_percent: f64,
}

/// Resolves product keys across all vendors.
#[derive(Debug)]
pub struct AggregationService {
    cache: Arc<dyn CacheStore>,
    fan_out: FanOutCoordinator,
    freshness: FreshnessFilter,
    selector: Arc<dyn QuoteSelector>,
    cache_ttl: Duration,
    cache_timeout: Duration,
    registry: Arc<CircuitBreakerRegistry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AggregationService {
    /// Creates a service from its collaborators.
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheStore>,
        fan_out: FanOutCoordinator,
        freshness: FreshnessFilter,
        selector: Arc<dyn QuoteSelector>,
        cache_ttl: Duration,
        registry: Arc<CircuitBreakerRegistry>,
    ) -> Self {
        Self {
            cache,
            fan_out,
            freshness,
            selector,
            cache_ttl,
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
            registry,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Sets the bound on a single cache operation.
    #[must_use]
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    /// Returns the breaker registry, for metrics consumers.
    #[must_use]
    pub fn registry(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.registry
    }

    /// Resolves `key` into the best available offer.
    ///
    /// Never fails: when no vendor can supply the product the result is
    /// out of stock.
    pub async fn resolve(&self, key: &ProductKey) -> AggregateResult {
        match self.bounded(self.cache.get(key)).await {
            Ok(Some(cached)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Cache hit");
                return cached;
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Cache miss");
            }
            Err(error) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %key, error = %error, "Cache read failed, querying vendors");
            }
        }

        let quotes = self.fan_out.collect(key).await;
        let (fresh, stale) = self.freshness.partition(quotes, Timestamp::now());
        if !stale.is_empty() {
            let vendors: Vec<&str> = stale.iter().map(|q| q.vendor_id().as_str()).collect();
            tracing::info!(
                key = %key,
                dropped = stale.len(),
                vendors = ?vendors,
                max_age_secs = self.freshness.max_age().as_secs(),
                "Dropped stale quotes"
            );
        }

        let Some(selected) = self.selector.select(&fresh) else {
            tracing::info!(key = %key, candidates = fresh.len(), "No vendor can supply product");
            return AggregateResult::out_of_stock(key.clone());
        };

        let result = AggregateResult::from_quote(key.clone(), selected);
        tracing::info!(
            key = %key,
            vendor = %selected.vendor_id(),
            price = %selected.price(),
            stock = selected.stock(),
            policy = self.selector.name(),
            "Selected offer"
        );

        if let Err(error) = self
            .bounded(self.cache.set(key, &result, self.cache_ttl))
            .await
        {
            tracing::warn!(key = %key, error = %error, "Cache write failed, result not cached");
        }

        result
    }

    /// Removes the cached result for `key`.
    ///
    /// Returns true if an entry was removed; cache failures return false.
    pub async fn invalidate(&self, key: &ProductKey) -> bool {
        match self.bounded(self.cache.delete(key)).await {
            Ok(removed) => {
                tracing::info!(key = %key, removed, "Cache entry invalidated");
                removed
            }
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Cache invalidation failed");
                false
            }
        }
    }

    async fn bounded<T>(&self, operation: impl Future<Output = CacheResult<T>>) -> CacheResult<T> {
        tokio::time::timeout(self.cache_timeout, operation)
            .await
            .unwrap_or_else(|_| Err(CacheError::timeout(self.cache_timeout)))
    }

    /// Returns cache hit/miss counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits.saturating_add(misses);
        let hit_rate_percent = if total == 0 {
            0.0
        } else {
            let rate = hits as f64 / total as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate_percent,
        }
    }
}
