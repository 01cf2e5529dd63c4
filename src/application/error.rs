//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Runtime vendor and cache failures never surface here: they degrade to a
//! smaller quote set or a cache miss. What remains are failures to build the
//! service at all.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── BreakerNotRegistered { vendor }        - Vendor wired without a breaker
//! ├── Domain(DomainError)                    - Invalid business parameters
//! ├── Infrastructure(InfrastructureError)    - Cache/HTTP client setup failures
//! └── Configuration(String)                  - Unloadable or invalid settings
//! ```
//!
//! # Examples
//!
//! ```
//! use vendor_aggregator::application::error::{ApplicationError, InfrastructureError};
//! use vendor_aggregator::domain::value_objects::VendorId;
//!
//! let err = ApplicationError::breaker_not_registered(VendorId::new("VendorFour"));
//! assert!(err.is_misconfiguration());
//!
//! let app_err: ApplicationError = InfrastructureError::cache("connection refused").into();
//! assert!(!app_err.is_misconfiguration());
//! ```

use crate::domain::errors::DomainError;
use crate::domain::value_objects::VendorId;
use crate::infrastructure::cache::CacheError;
use crate::infrastructure::vendors::error::VendorError;
use thiserror::Error;

/// Infrastructure layer error.
///
/// Raised while constructing infrastructure components such as the Redis
/// connection or the shared HTTP client.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Cache store error.
    #[error("cache error: {0}")]
    Cache(String),

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl InfrastructureError {
    /// Creates a cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<CacheError> for InfrastructureError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Serialization { message } => Self::serialization(message),
            other => Self::cache(other.to_string()),
        }
    }
}

impl From<VendorError> for InfrastructureError {
    fn from(err: VendorError) -> Self {
        Self::network(err.to_string())
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A vendor was wired into fan-out without a registered circuit breaker.
    #[error("circuit breaker not registered for vendor: {vendor}")]
    BreakerNotRegistered {
        /// The unknown vendor.
        vendor: VendorId,
    },

    /// Domain error from business parameters.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Infrastructure error from external systems.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Creates a breaker not registered error.
    #[must_use]
    pub fn breaker_not_registered(vendor: VendorId) -> Self {
        Self::BreakerNotRegistered { vendor }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this error stems from wiring or settings rather than
    /// an external system.
    #[must_use]
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::BreakerNotRegistered { .. } | Self::Configuration(_) | Self::Domain(_)
        )
    }
}

impl From<CacheError> for ApplicationError {
    fn from(err: CacheError) -> Self {
        Self::Infrastructure(err.into())
    }
}

impl From<VendorError> for ApplicationError {
    fn from(err: VendorError) -> Self {
        Self::Infrastructure(err.into())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
