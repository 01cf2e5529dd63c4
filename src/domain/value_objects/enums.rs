//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! - [`StockStatus`] - Availability of a product at a vendor
//! - [`BreakerState`] - Circuit breaker state for a vendor
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Availability status of a product.
///
/// # Examples
///
/// ```
/// use vendor_aggregator::domain::value_objects::enums::StockStatus;
///
/// assert_eq!(StockStatus::for_stock(0), StockStatus::OutOfStock);
/// assert_eq!(StockStatus::for_stock(3).to_string(), "IN_STOCK");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum StockStatus {
    /// At least one unit is available.
    InStock = 0,
    /// No units are available.
    OutOfStock = 1,
}

impl StockStatus {
    /// Returns the status implied by a stock quantity.
    #[inline]
    #[must_use]
    pub const fn for_stock(stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else {
            Self::InStock
        }
    }

    /// Returns true if the product is in stock.
    #[inline]
    #[must_use]
    pub const fn is_in_stock(self) -> bool {
        matches!(self, Self::InStock)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InStock => write!(f, "IN_STOCK"),
            Self::OutOfStock => write!(f, "OUT_OF_STOCK"),
        }
    }
}

impl FromStr for StockStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "IN_STOCK" | "INSTOCK" => Ok(Self::InStock),
            "OUT_OF_STOCK" | "OUTOFSTOCK" => Ok(Self::OutOfStock),
            _ => Err(ParseEnumError::InvalidValue("StockStatus", s.to_string())),
        }
    }
}

/// State of a vendor circuit breaker.
///
/// ```text
/// closed -> open -> half_open -> {closed | open}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BreakerState {
    /// Calls flow normally.
    Closed = 0,
    /// Calls are skipped until the cooldown elapses.
    Open = 1,
    /// Probe calls are let through to test recovery.
    HalfOpen = 2,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half_open"),
        }
    }
}

impl FromStr for BreakerState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "closed" => Ok(Self::Closed),
            "open" => Ok(Self::Open),
            "half_open" | "halfopen" => Ok(Self::HalfOpen),
            _ => Err(ParseEnumError::InvalidValue("BreakerState", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
