//! # Vendor Aggregator
//!
//! Resolves a product key into a single best offer by querying several
//! upstream vendors concurrently.
//!
//! Each vendor is isolated behind a circuit breaker and called with a
//! per-attempt timeout and bounded exponential backoff. Quotes older than
//! the freshness window are discarded; the cheapest in-stock quote wins
//! unless a pricier vendor holds materially more stock. Selected results
//! are cached with a TTL; out-of-stock answers never are.
//!
//! ## Layers
//!
//! - [`domain`]: Quotes, aggregate results, freshness and selection rules
//! - [`application`]: Circuit breakers, retries, fan-out and the [`AggregationService`]
//! - [`infrastructure`]: Vendor gateways and cache stores
//! - [`config`]: Layered configuration
//! - [`bootstrap`]: Wiring from configuration
//!
//! ## Example
//!
//! ```no_run
//! use vendor_aggregator::bootstrap::build_service;
//! use vendor_aggregator::config::AppConfig;
//! use vendor_aggregator::domain::value_objects::ProductKey;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = build_service(&AppConfig::load()?).await?;
//! let result = service.resolve(&ProductKey::new("ABC123")).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::services::AggregationService;
