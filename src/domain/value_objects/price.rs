//! # Price Value Object
//!
//! Strictly positive decimal price.
//!
//! # Examples
//!
//! ```
//! use vendor_aggregator::domain::value_objects::Price;
//! use rust_decimal::Decimal;
//!
//! let cheap = Price::new(100.0).unwrap();
//! let dear = Price::new(115.0).unwrap();
//! assert_eq!(dear.percent_above(&cheap).unwrap(), Decimal::new(15, 0));
//! assert!(Price::new(0.0).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A price quoted by a vendor.
///
/// # Invariants
///
/// - Always strictly greater than zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Creates a price from a floating point value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the value is not finite or not positive.
    pub fn new(value: f64) -> DomainResult<Self> {
        let decimal = Decimal::from_f64(value)
            .ok_or_else(|| DomainError::invalid_price(format!("{} is not representable", value)))?;
        Self::from_decimal(decimal)
    }

    /// Creates a price from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the value is not positive.
    pub fn from_decimal(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::invalid_price(format!(
                "{} must be greater than zero",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Returns the underlying decimal.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns the price as `f64`, for display and scoring only.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Returns how many percent this price lies above `base`.
    ///
    /// Negative when this price is below `base`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ArithmeticOverflow` if the computation overflows.
    pub fn percent_above(&self, base: &Price) -> DomainResult<Decimal> {
        let overflow = || DomainError::arithmetic_overflow(format!("{} relative to {}", self, base));
        self.0
            .checked_sub(base.0)
            .and_then(|diff| diff.checked_div(base.0))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(overflow)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
