//! # Domain Errors
//!
//! Error types raised when a domain invariant is violated.
//!
//! # Examples
//!
//! ```
//! use vendor_aggregator::domain::errors::DomainError;
//!
//! let err = DomainError::invalid_price("price must be positive");
//! assert!(err.to_string().contains("positive"));
//! ```

use crate::domain::value_objects::enums::StockStatus;
use thiserror::Error;

/// Error type for domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Price is zero, negative or not representable.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Stock quantity and availability status disagree.
    #[error("inconsistent stock: {stock} units reported as {status}")]
    InconsistentStock {
        /// Reported stock quantity.
        stock: u32,
        /// Reported availability status.
        status: StockStatus,
    },

    /// A configured business parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Decimal arithmetic overflowed.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(String),
}

impl DomainError {
    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(message: impl Into<String>) -> Self {
        Self::InvalidPrice(message.into())
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Creates an arithmetic overflow error.
    #[must_use]
    pub fn arithmetic_overflow(message: impl Into<String>) -> Self {
        Self::ArithmeticOverflow(message.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inconsistent_stock_display() {
        let err = DomainError::InconsistentStock {
            stock: 0,
            status: StockStatus::InStock,
        };
        assert_eq!(
            err.to_string(),
            "inconsistent stock: 0 units reported as IN_STOCK"
        );
    }

    #[test]
    fn constructors_wrap_message() {
        assert_eq!(
            DomainError::invalid_configuration("max age must be positive"),
            DomainError::InvalidConfiguration("max age must be positive".to_string())
        );
    }
}
