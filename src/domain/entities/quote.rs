//! # Quote Entity
//!
//! One vendor's normalized price and stock answer for a product key.
//!
//! # Examples
//!
//! ```
//! use vendor_aggregator::domain::entities::quote::Quote;
//! use vendor_aggregator::domain::value_objects::{Price, ProductKey, StockStatus, Timestamp, VendorId};
//!
//! let quote = Quote::new(
//!     VendorId::new("VendorOne"),
//!     ProductKey::new("ABC123"),
//!     Price::new(99.99).unwrap(),
//!     10,
//!     Timestamp::now(),
//! )
//! .with_latency_ms(150);
//!
//! assert_eq!(quote.status(), StockStatus::InStock);
//! assert_eq!(quote.latency_ms(), Some(150));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Price, ProductKey, StockStatus, Timestamp, VendorId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized vendor quote.
///
/// # Invariants
///
/// - `status == OutOfStock` if and only if `stock == 0`
/// - Price is strictly positive (enforced by [`Price`])
///
/// Immutable once constructed; lives only for the aggregation cycle that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuoteParts")]
pub struct Quote {
    vendor_id: VendorId,
    product_key: ProductKey,
    price: Price,
    stock: u32,
    status: StockStatus,
    observed_at: Timestamp,
    latency_ms: Option<u64>,
}

impl Quote {
    /// Creates a quote, deriving the availability status from `stock`.
    #[must_use]
    pub fn new(
        vendor_id: VendorId,
        product_key: ProductKey,
        price: Price,
        stock: u32,
        observed_at: Timestamp,
    ) -> Self {
        Self {
            vendor_id,
            product_key,
            price,
            stock,
            status: StockStatus::for_stock(stock),
            observed_at,
            latency_ms: None,
        }
    }

    /// Creates a quote with an explicit status (for reconstruction).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InconsistentStock` if `status` disagrees with `stock`.
    pub fn from_parts(
        vendor_id: VendorId,
        product_key: ProductKey,
        price: Price,
        stock: u32,
        status: StockStatus,
        observed_at: Timestamp,
        latency_ms: Option<u64>,
    ) -> DomainResult<Self> {
        if status != StockStatus::for_stock(stock) {
            return Err(DomainError::InconsistentStock { stock, status });
        }
        Ok(Self {
            vendor_id,
            product_key,
            price,
            stock,
            status,
            observed_at,
            latency_ms,
        })
    }

    /// Attaches the measured call latency.
    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    /// Returns the vendor that produced this quote.
    #[inline]
    #[must_use]
    pub fn vendor_id(&self) -> &VendorId {
        &self.vendor_id
    }

    /// Returns the product key.
    #[inline]
    #[must_use]
    pub fn product_key(&self) -> &ProductKey {
        &self.product_key
    }

    /// Returns the quoted price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Returns the available stock.
    #[inline]
    #[must_use]
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Returns the availability status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> StockStatus {
        self.status
    }

    /// Returns when the vendor observed this data.
    #[inline]
    #[must_use]
    pub fn observed_at(&self) -> Timestamp {
        self.observed_at
    }

    /// Returns the measured call latency, if known.
    #[inline]
    #[must_use]
    pub fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }

    /// Returns true if the quote can be sold from.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.stock > 0 && self.status.is_in_stock()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} {} @ {} x{} {})",
            self.vendor_id, self.product_key, self.price, self.stock, self.status
        )
    }
}

#[derive(Deserialize)]
struct QuoteParts {
    vendor_id: VendorId,
    product_key: ProductKey,
    price: Price,
    stock: u32,
    status: StockStatus,
    observed_at: Timestamp,
    latency_ms: Option<u64>,
}

impl TryFrom<QuoteParts> for Quote {
    type Error = DomainError;

    fn try_from(parts: QuoteParts) -> Result<Self, Self::Error> {
        Self::from_parts(
            parts.vendor_id,
            parts.product_key,
            parts.price,
            parts.stock,
            parts.status,
            parts.observed_at,
            parts.latency_ms,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quote(stock: u32) -> Quote {
        Quote::new(
            VendorId::new("VendorTwo"),
            ProductKey::new("XYZ789"),
            Price::new(155.0).unwrap(),
            stock,
            Timestamp::from_secs(1_704_067_200).unwrap(),
        )
    }

    #[test]
    fn status_follows_stock() {
        assert_eq!(quote(0).status(), StockStatus::OutOfStock);
        assert!(!quote(0).is_available());
        assert_eq!(quote(8).status(), StockStatus::InStock);
        assert!(quote(8).is_available());
    }

    #[test]
    fn from_parts_rejects_inconsistent_status() {
        let result = Quote::from_parts(
            VendorId::new("VendorTwo"),
            ProductKey::new("XYZ789"),
            Price::new(155.0).unwrap(),
            0,
            StockStatus::InStock,
            Timestamp::now(),
            None,
        );
        assert!(matches!(
            result,
            Err(DomainError::InconsistentStock { stock: 0, .. })
        ));
    }

    #[test]
    fn deserialization_validates() {
        let json = serde_json::to_string(&quote(8)).unwrap();
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quote(8));

        let tampered = json.replace("IN_STOCK", "OUT_OF_STOCK");
        assert!(serde_json::from_str::<Quote>(&tampered).is_err());
    }

    #[test]
    fn display_names_vendor_and_price() {
        let text = quote(8).to_string();
        assert!(text.contains("VendorTwo"));
        assert!(text.contains("155"));
    }
}
