//! # Aggregate Result
//!
//! The single answer surfaced for a product key: either the selected quote or
//! an explicit out-of-stock marker with no vendor.

use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{Price, ProductKey, StockStatus, Timestamp, VendorId};
use serde::{Deserialize, Serialize};

/// Message attached to results where no vendor could supply the product.
pub const UNAVAILABLE_MESSAGE: &str = "Product not available from any vendor";

/// Result of resolving one product key.
///
/// Written to the cache after a successful selection and handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    product_key: ProductKey,
    status: StockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor: Option<VendorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AggregateResult {
    /// Builds a result from the selected quote.
    #[must_use]
    pub fn from_quote(product_key: ProductKey, quote: &Quote) -> Self {
        Self {
            product_key,
            status: quote.status(),
            vendor: Some(quote.vendor_id().clone()),
            price: Some(quote.price()),
            stock: Some(quote.stock()),
            observed_at: Some(quote.observed_at()),
            message: None,
        }
    }

    /// Builds the explicit "no viable quote" result.
    #[must_use]
    pub fn out_of_stock(product_key: ProductKey) -> Self {
        Self {
            product_key,
            status: StockStatus::OutOfStock,
            vendor: None,
            price: None,
            stock: None,
            observed_at: None,
            message: Some(UNAVAILABLE_MESSAGE.to_string()),
        }
    }

    /// Returns the product key.
    #[inline]
    #[must_use]
    pub fn product_key(&self) -> &ProductKey {
        &self.product_key
    }

    /// Returns the overall availability status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> StockStatus {
        self.status
    }

    /// Returns the selected vendor, if any.
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> Option<&VendorId> {
        self.vendor.as_ref()
    }

    /// Returns the selected price, if any.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price
    }

    /// Returns the selected stock, if any.
    #[inline]
    #[must_use]
    pub fn stock(&self) -> Option<u32> {
        self.stock
    }

    /// Returns when the selected quote was observed, if any.
    #[inline]
    #[must_use]
    pub fn observed_at(&self) -> Option<Timestamp> {
        self.observed_at
    }

    /// Returns the informational message, if any.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if a vendor was selected.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.vendor.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_quote_copies_selection() {
        let quote = Quote::new(
            VendorId::new("VendorOne"),
            ProductKey::new("ABC123"),
            Price::new(99.99).unwrap(),
            10,
            Timestamp::from_secs(1_704_067_200).unwrap(),
        );
        let result = AggregateResult::from_quote(ProductKey::new("ABC123"), &quote);

        assert!(result.is_available());
        assert_eq!(result.vendor().map(VendorId::as_str), Some("VendorOne"));
        assert_eq!(result.stock(), Some(10));
        assert_eq!(result.status(), StockStatus::InStock);
        assert!(result.message().is_none());
    }

    #[test]
    fn out_of_stock_has_no_vendor() {
        let result = AggregateResult::out_of_stock(ProductKey::new("GHI303"));
        assert!(!result.is_available());
        assert_eq!(result.status(), StockStatus::OutOfStock);
        assert!(result.price().is_none());
        assert_eq!(result.message(), Some(UNAVAILABLE_MESSAGE));
    }

    #[test]
    fn out_of_stock_json_omits_empty_fields() {
        let result = AggregateResult::out_of_stock(ProductKey::new("GHI303"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "OUT_OF_STOCK");
        assert!(json.get("vendor").is_none());

        let back: AggregateResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
