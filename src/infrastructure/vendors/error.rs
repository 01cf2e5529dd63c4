//! # Vendor Errors
//!
//! Error types for vendor gateway calls.
//!
//! "Not found" is not an error: gateways report it as `Ok(None)`.
//!
//! # Examples
//!
//! ```
//! use vendor_aggregator::infrastructure::vendors::error::VendorError;
//!
//! let error = VendorError::timeout_with_duration("no answer", 2000);
//! assert!(error.is_retryable());
//!
//! let error = VendorError::protocol("missing field `sku`");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for vendor gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VendorError {
    /// Request timed out.
    #[error("vendor timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("vendor connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("vendor rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Vendor answered with a server error.
    #[error("vendor upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Response could not be parsed or normalized.
    #[error("vendor protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Vendor-side failure without a more specific category.
    #[error("vendor internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl VendorError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>, retry_after_ms: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms,
        }
    }

    /// Creates an upstream error.
    #[must_use]
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient.
    ///
    /// The retry executor retries every failure; this only classifies
    /// failures for logging.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Protocol { .. })
    }

    /// Returns true if this is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns the retry delay in milliseconds, if the vendor sent one.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for vendor operations.
pub type VendorResult<T> = Result<T, VendorError>;
