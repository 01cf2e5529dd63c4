//! # Simulated Vendor
//!
//! In-process vendor backed by a static catalog. Simulates network delay and
//! intermittent failures, then answers in its configured raw format so the
//! normalization path is exercised exactly as for a remote vendor.

use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{ProductKey, Timestamp, VendorId};
use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use crate::infrastructure::vendors::raw::RawFormat;
use crate::infrastructure::vendors::traits::VendorGateway;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// A catalog line: unit price and optional stock quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    /// Unit price.
    pub price: f64,
    /// Units available; `None` when the vendor does not report a quantity.
    pub stock: Option<u32>,
}

impl CatalogEntry {
    /// Creates a catalog entry.
    #[must_use]
    pub const fn new(price: f64, stock: Option<u32>) -> Self {
        Self { price, stock }
    }
}

/// Returns the built-in demo catalog for a vendor format.
#[must_use]
pub fn default_catalog(format: RawFormat) -> HashMap<ProductKey, CatalogEntry> {
    let entries: &[(&str, f64, Option<u32>)] = match format {
        RawFormat::VendorOne => &[
            ("ABC123", 99.99, Some(10)),
            ("XYZ789", 149.50, None),
            ("DEF456", 75.00, Some(25)),
            ("LMN101", 200.00, Some(0)),
            ("PQR202", 50.00, Some(100)),
        ],
        RawFormat::VendorTwo => &[
            ("ABC123", 105.50, Some(15)),
            ("XYZ789", 155.00, Some(8)),
            ("DEF456", 72.50, None),
            ("LMN101", 195.00, Some(5)),
            ("PQR202", 52.00, Some(75)),
            ("GHI303", 89.99, Some(0)),
            ("JKL404", 120.00, Some(50)),
        ],
        RawFormat::VendorThree => &[
            ("ABC123", 95.00, Some(8)),
            ("XYZ789", 165.00, Some(40)),
            ("DEF456", 80.00, Some(60)),
            ("PQR202", 49.00, None),
            ("GHI303", 92.50, Some(0)),
            ("STU505", 310.00, Some(3)),
        ],
    };

    entries
        .iter()
        .map(|(key, price, stock)| (ProductKey::new(*key), CatalogEntry::new(*price, *stock)))
        .collect()
}

/// Catalog-backed vendor with simulated latency and failures.
#[derive(Debug, Clone)]
pub struct SimulatedVendor {
    vendor_id: VendorId,
    format: RawFormat,
    catalog: HashMap<ProductKey, CatalogEntry>,
    min_delay: Duration,
    max_delay: Duration,
    failure_rate: f64,
}

impl SimulatedVendor {
    /// Creates a vendor with an empty catalog, no delay and no failures.
    #[must_use]
    pub fn new(vendor_id: VendorId, format: RawFormat) -> Self {
        Self {
            vendor_id,
            format,
            catalog: HashMap::new(),
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    /// Replaces the catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: HashMap<ProductKey, CatalogEntry>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Loads the built-in demo catalog for this vendor's format.
    #[must_use]
    pub fn with_default_catalog(self) -> Self {
        let catalog = default_catalog(self.format);
        self.with_catalog(catalog)
    }

    /// Adds or replaces one product.
    #[must_use]
    pub fn with_product(mut self, key: &str, price: f64, stock: Option<u32>) -> Self {
        self.catalog
            .insert(ProductKey::new(key), CatalogEntry::new(price, stock));
        self
    }

    /// Sets the simulated delay range.
    #[must_use]
    pub fn with_delay(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min.min(max);
        self.max_delay = max.max(min);
        self
    }

    /// Sets the probability in `[0, 1]` that a call fails.
    #[must_use]
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    /// Returns the raw format this vendor answers in.
    #[must_use]
    pub fn format(&self) -> RawFormat {
        self.format
    }

    fn sample_delay(&self) -> Duration {
        let span = self.max_delay.saturating_sub(self.min_delay).as_millis();
        if span == 0 {
            return self.min_delay;
        }
        let span = u64::try_from(span).unwrap_or(u64::MAX);
        let offset = rand::random::<u64>() % span.saturating_add(1);
        self.min_delay + Duration::from_millis(offset)
    }
}

#[async_trait]
impl VendorGateway for SimulatedVendor {
    fn vendor_id(&self) -> &VendorId {
        &self.vendor_id
    }

    async fn fetch(&self, key: &ProductKey) -> VendorResult<Option<Quote>> {
        let started = Instant::now();

        let delay = self.sample_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failure_rate > 0.0 && rand::random::<f64>() < self.failure_rate {
            tracing::warn!(vendor = %self.vendor_id, key = %key, "Simulated vendor failure");
            return Err(VendorError::upstream(
                503,
                format!("{} temporarily unavailable", self.vendor_id),
            ));
        }

        let Some(entry) = self.catalog.get(key) else {
            tracing::debug!(vendor = %self.vendor_id, key = %key, "Product not in catalog");
            return Ok(None);
        };

        let raw = self
            .format
            .compose(key, entry.price, entry.stock, Timestamp::now());
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let quote = raw.normalize(&self.vendor_id)?.with_latency_ms(latency_ms);

        tracing::debug!(
            vendor = %self.vendor_id,
            key = %key,
            price = %quote.price(),
            stock = quote.stock(),
            latency_ms,
            "Simulated vendor answered"
        );

        Ok(Some(quote))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::StockStatus;

    fn vendor_two() -> SimulatedVendor {
        SimulatedVendor::new(VendorId::new("VendorTwo"), RawFormat::VendorTwo)
            .with_default_catalog()
    }

    #[tokio::test]
    async fn returns_catalog_quote() {
        let quote = vendor_two()
            .fetch(&ProductKey::new("XYZ789"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(quote.vendor_id().as_str(), "VendorTwo");
        assert_eq!(quote.stock(), 8);
        assert_eq!(quote.price().to_f64(), 155.0);
        assert!(quote.latency_ms().is_some());
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let result = vendor_two().fetch(&ProductKey::new("NOPE000")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn null_stock_normalizes_to_five() {
        let quote = vendor_two()
            .fetch(&ProductKey::new("DEF456"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quote.stock(), 5);
        assert_eq!(quote.status(), StockStatus::InStock);
    }

    #[tokio::test]
    async fn zero_stock_is_out_of_stock() {
        let quote = vendor_two()
            .fetch(&ProductKey::new("GHI303"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quote.status(), StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn added_product_is_served_and_overrides_catalog() {
        let vendor = vendor_two()
            .with_product("NEW001", 12.5, Some(3))
            .with_product("XYZ789", 99.0, Some(1));

        let added = vendor.fetch(&ProductKey::new("NEW001")).await.unwrap().unwrap();
        assert_eq!(added.stock(), 3);
        assert_eq!(added.price().to_f64(), 12.5);

        let replaced = vendor.fetch(&ProductKey::new("XYZ789")).await.unwrap().unwrap();
        assert_eq!(replaced.stock(), 1);
        assert_eq!(replaced.price().to_f64(), 99.0);
    }

    #[tokio::test]
    async fn always_failing_vendor_errors() {
        let vendor = vendor_two().with_failure_rate(1.0);
        let err = vendor.fetch(&ProductKey::new("XYZ789")).await.unwrap_err();
        assert!(matches!(err, VendorError::Upstream { status: 503, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_stays_within_range() {
        let vendor = vendor_two().with_delay(Duration::from_millis(200), Duration::from_millis(500));
        let started = Instant::now();
        vendor.fetch(&ProductKey::new("ABC123")).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed <= Duration::from_millis(500));
    }

    #[test]
    fn default_catalogs_differ_per_format() {
        assert!(default_catalog(RawFormat::VendorOne).contains_key(&ProductKey::new("LMN101")));
        assert!(!default_catalog(RawFormat::VendorOne).contains_key(&ProductKey::new("JKL404")));
        assert!(default_catalog(RawFormat::VendorThree).contains_key(&ProductKey::new("STU505")));
    }
}
