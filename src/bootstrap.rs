//! # Bootstrap
//!
//! Wires an [`AggregationService`] from an [`AppConfig`]: vendor gateways,
//! one circuit breaker per vendor, the cache store and the domain policies.

use crate::application::error::ApplicationResult;
use crate::application::services::{
    AggregationService, CircuitBreakerRegistry, FanOutCoordinator, RetryPolicy,
};
use crate::config::{AppConfig, CacheConfig, VendorConfig, VendorKind};
use crate::domain::services::{FreshnessFilter, SelectionPolicy};
use crate::domain::value_objects::VendorId;
use crate::infrastructure::cache::{CacheStore, InMemoryCacheStore, RedisCacheStore};
use crate::infrastructure::vendors::{HttpClient, HttpVendorGateway, SimulatedVendor, VendorGateway};
use std::sync::Arc;
use std::time::Duration;

/// Builds the aggregation service described by `config`.
///
/// # Errors
///
/// Returns an error if `config` is invalid or the HTTP client cannot be built.
/// An unreachable Redis is not an error: the in-memory store is used instead.
pub async fn build_service(config: &AppConfig) -> ApplicationResult<AggregationService> {
    config.validate()?;

    let registry = Arc::new(CircuitBreakerRegistry::new(config.breaker.clone()));
    let gateways = build_gateways(&config.vendors, config.retry.timeout_ms, &registry)?;
    let fan_out = FanOutCoordinator::new(gateways, &registry, RetryPolicy::from_config(&config.retry))?;

    let freshness = FreshnessFilter::new(config.freshness.max_age())?;
    let selector = Arc::new(SelectionPolicy::new(config.selection.price_threshold_percent)?);
    let cache = build_cache(&config.cache).await;

    tracing::info!(
        vendors = registry.len(),
        cache_ttl_secs = config.cache.ttl_secs,
        max_age_secs = config.freshness.max_age_secs,
        price_threshold_percent = %config.selection.price_threshold_percent,
        "Aggregation service ready"
    );

    Ok(AggregationService::new(
        cache,
        fan_out,
        freshness,
        selector,
        config.cache.ttl(),
        registry,
    )
    .with_cache_timeout(config.cache.timeout()))
}

/// Creates one gateway per vendor and registers its breaker.
///
/// # Errors
///
/// Returns an error if an HTTP vendor is configured and the client cannot be built.
pub fn build_gateways(
    vendors: &[VendorConfig],
    timeout_ms: u64,
    registry: &CircuitBreakerRegistry,
) -> ApplicationResult<Vec<Arc<dyn VendorGateway>>> {
    let mut client: Option<HttpClient> = None;
    let mut gateways: Vec<Arc<dyn VendorGateway>> = Vec::with_capacity(vendors.len());

    for vendor in vendors {
        let vendor_id = VendorId::new(vendor.name.as_str());
        registry.register(vendor_id.clone());

        let gateway: Arc<dyn VendorGateway> = match &vendor.kind {
            VendorKind::Simulated {
                min_delay_ms,
                max_delay_ms,
                failure_rate,
            } => Arc::new(
                SimulatedVendor::new(vendor_id, vendor.format)
                    .with_default_catalog()
                    .with_delay(
                        Duration::from_millis(*min_delay_ms),
                        Duration::from_millis(*max_delay_ms),
                    )
                    .with_failure_rate(*failure_rate),
            ),
            VendorKind::Http { base_url } => {
                let client = match &client {
                    Some(client) => client.clone(),
                    None => {
                        let created = HttpClient::new(timeout_ms)?;
                        client = Some(created.clone());
                        created
                    }
                };
                Arc::new(HttpVendorGateway::new(
                    vendor_id,
                    base_url.as_str(),
                    vendor.format,
                    client,
                ))
            }
        };

        tracing::debug!(vendor = %vendor.name, format = %vendor.format, "Vendor gateway created");
        gateways.push(gateway);
    }

    Ok(gateways)
}

/// Connects to Redis when configured, otherwise uses an in-memory store.
pub async fn build_cache(config: &CacheConfig) -> Arc<dyn CacheStore> {
    let Some(url) = config.redis_url.as_deref() else {
        tracing::info!("Using in-memory cache");
        return Arc::new(InMemoryCacheStore::new());
    };

    match RedisCacheStore::connect(url, config.key_prefix.as_str()).await {
        Ok(store) => Arc::new(store),
        Err(error) => {
            tracing::warn!(error = %error, "Redis unavailable, using in-memory cache");
            Arc::new(InMemoryCacheStore::new())
        }
    }
}
