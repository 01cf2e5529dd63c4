//! # Raw Vendor Formats
//!
//! Each vendor speaks its own JSON dialect. This module holds one struct per
//! dialect and the normalization into [`Quote`].
//!
//! | Format        | Key field     | Quantity          | Price          | Availability                 | Timestamp            |
//! |---------------|---------------|-------------------|----------------|------------------------------|----------------------|
//! | `vendor_one`  | `product_id`  | `quantity`        | `unit_price`   | `availability_status` string | `last_updated`       |
//! | `vendor_two`  | `sku`         | `stock_count`     | `price_amount` | `in_stock` bool              | `response_timestamp` |
//! | `vendor_three`| `item_code`   | `available_units` | `cost`         | `status_code` (1 = in stock) | `data_timestamp`     |
//!
//! Stock normalization is shared by all formats:
//!
//! - quantity missing and the vendor signals "in stock" ⇒ 5 units
//! - quantity positive ⇒ that quantity
//! - otherwise ⇒ 0 units, out of stock

use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{Price, ProductKey, StockStatus, Timestamp, VendorId};
use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock assumed when a vendor reports "in stock" without a quantity.
pub const ASSUMED_STOCK_WHEN_UNKNOWN: u32 = 5;

/// Applies the shared stock normalization rule.
#[must_use]
pub fn normalize_stock(quantity: Option<u32>, in_stock_signal: bool) -> u32 {
    match quantity {
        None if in_stock_signal => ASSUMED_STOCK_WHEN_UNKNOWN,
        Some(units) if units > 0 => units,
        _ => 0,
    }
}

/// Wire format spoken by a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawFormat {
    /// `product_id` / `quantity` / `unit_price` / `availability_status`.
    VendorOne,
    /// `sku` / `stock_count` / `price_amount` / `in_stock`.
    VendorTwo,
    /// `item_code` / `available_units` / `cost` / `status_code`.
    VendorThree,
}

impl fmt::Display for RawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VendorOne => write!(f, "vendor_one"),
            Self::VendorTwo => write!(f, "vendor_two"),
            Self::VendorThree => write!(f, "vendor_three"),
        }
    }
}

impl RawFormat {
    /// Parses a JSON response body in this format.
    ///
    /// # Errors
    ///
    /// Returns `VendorError::Protocol` if the body does not match the format.
    pub fn decode(self, body: &[u8]) -> VendorResult<RawResponse> {
        let parsed = match self {
            Self::VendorOne => serde_json::from_slice(body).map(RawResponse::VendorOne),
            Self::VendorTwo => serde_json::from_slice(body).map(RawResponse::VendorTwo),
            Self::VendorThree => serde_json::from_slice(body).map(RawResponse::VendorThree),
        };
        parsed.map_err(|e| VendorError::protocol(format!("invalid {} response: {}", self, e)))
    }

    /// Builds a response in this format from catalog data.
    ///
    /// A missing quantity is reported as "in stock", a zero quantity as
    /// "out of stock".
    #[must_use]
    pub fn compose(
        self,
        key: &ProductKey,
        price: f64,
        quantity: Option<u32>,
        observed_at: Timestamp,
    ) -> RawResponse {
        let in_stock = quantity.is_none_or(|units| units > 0);
        let timestamp = observed_at.to_iso8601();
        match self {
            Self::VendorOne => RawResponse::VendorOne(VendorOneRaw {
                product_id: key.to_string(),
                quantity,
                unit_price: price,
                availability_status: StockStatus::for_stock(u32::from(in_stock)).to_string(),
                last_updated: timestamp,
            }),
            Self::VendorTwo => RawResponse::VendorTwo(VendorTwoRaw {
                sku: key.to_string(),
                stock_count: quantity,
                price_amount: price,
                in_stock,
                response_timestamp: timestamp,
            }),
            Self::VendorThree => RawResponse::VendorThree(VendorThreeRaw {
                item_code: key.to_string(),
                available_units: quantity,
                cost: price,
                status_code: u8::from(in_stock),
                data_timestamp: timestamp,
            }),
        }
    }
}

/// Response as sent by the first vendor dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorOneRaw {
    /// Product identifier.
    pub product_id: String,
    /// Units available; may be absent.
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Unit price.
    pub unit_price: f64,
    /// `IN_STOCK`, `OUT_OF_STOCK` or a vendor-specific value.
    pub availability_status: String,
    /// RFC 3339 observation time.
    pub last_updated: String,
}

/// Response as sent by the second vendor dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTwoRaw {
    /// Product SKU.
    pub sku: String,
    /// Units available; may be absent.
    #[serde(default)]
    pub stock_count: Option<u32>,
    /// Unit price.
    pub price_amount: f64,
    /// Availability flag.
    pub in_stock: bool,
    /// RFC 3339 observation time.
    pub response_timestamp: String,
}

/// Response as sent by the third vendor dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorThreeRaw {
    /// Item code.
    pub item_code: String,
    /// Units available; may be absent.
    #[serde(default)]
    pub available_units: Option<u32>,
    /// Unit cost.
    pub cost: f64,
    /// `1` in stock, `0` out of stock.
    pub status_code: u8,
    /// RFC 3339 observation time.
    pub data_timestamp: String,
}

/// A decoded vendor response in any dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResponse {
    /// First dialect.
    VendorOne(VendorOneRaw),
    /// Second dialect.
    VendorTwo(VendorTwoRaw),
    /// Third dialect.
    VendorThree(VendorThreeRaw),
}

impl RawResponse {
    /// Normalizes the response into a [`Quote`] attributed to `vendor_id`.
    ///
    /// # Errors
    ///
    /// Returns `VendorError::Protocol` for a non-positive price or an
    /// unparseable timestamp.
    pub fn normalize(&self, vendor_id: &VendorId) -> VendorResult<Quote> {
        let (key, quantity, price, in_stock, timestamp) = match self {
            Self::VendorOne(raw) => (
                raw.product_id.as_str(),
                raw.quantity,
                raw.unit_price,
                raw.availability_status
                    .parse::<StockStatus>()
                    .is_ok_and(StockStatus::is_in_stock),
                raw.last_updated.as_str(),
            ),
            Self::VendorTwo(raw) => (
                raw.sku.as_str(),
                raw.stock_count,
                raw.price_amount,
                raw.in_stock,
                raw.response_timestamp.as_str(),
            ),
            Self::VendorThree(raw) => (
                raw.item_code.as_str(),
                raw.available_units,
                raw.cost,
                raw.status_code == 1,
                raw.data_timestamp.as_str(),
            ),
        };

        let price = Price::new(price)
            .map_err(|e| VendorError::protocol(format!("{}: {}", vendor_id, e)))?;
        let observed_at = Timestamp::parse_rfc3339(timestamp).ok_or_else(|| {
            VendorError::protocol(format!("{}: invalid timestamp {:?}", vendor_id, timestamp))
        })?;
        let stock = normalize_stock(quantity, in_stock);

        if quantity.is_none() && stock > 0 {
            tracing::debug!(
                vendor = %vendor_id,
                key = %key,
                stock,
                "Assumed stock for in-stock item without quantity"
            );
        }

        Ok(Quote::new(
            vendor_id.clone(),
            ProductKey::new(key),
            price,
            stock,
            observed_at,
        ))
    }

    /// Serializes the response as JSON.
    ///
    /// # Errors
    ///
    /// Returns `VendorError::Protocol` if serialization fails.
    pub fn to_json(&self) -> VendorResult<String> {
        serde_json::to_string(self).map_err(|e| VendorError::protocol(e.to_string()))
    }
}
