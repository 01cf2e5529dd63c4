//! # Vendor Gateway Trait
//!
//! Port definition for upstream vendors.
//!
//! A gateway performs exactly one call per `fetch` and never retries;
//! timeouts, retries and circuit breaking belong to the caller.
//!
//! # Examples
//!
//! ```ignore
//! use vendor_aggregator::infrastructure::vendors::traits::VendorGateway;
//!
//! struct MyVendor { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl VendorGateway for MyVendor {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{ProductKey, VendorId};
use crate::infrastructure::vendors::error::VendorResult;
use async_trait::async_trait;
use std::fmt;

/// Capability to fetch one product from one vendor.
#[async_trait]
pub trait VendorGateway: Send + Sync + fmt::Debug {
    /// Returns the vendor ID, also used as the circuit breaker key.
    fn vendor_id(&self) -> &VendorId;

    /// Fetches the vendor's current quote for `key`.
    ///
    /// Returns `Ok(None)` when the vendor has no record for the key.
    ///
    /// # Errors
    ///
    /// - `VendorError::Timeout` - The vendor did not answer in time
    /// - `VendorError::Connection` - The vendor could not be reached
    /// - `VendorError::RateLimited` - The vendor throttled the request
    /// - `VendorError::Upstream` - The vendor answered with a server error
    /// - `VendorError::Protocol` - The answer could not be normalized
    async fn fetch(&self, key: &ProductKey) -> VendorResult<Option<Quote>>;
}
