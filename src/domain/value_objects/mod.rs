//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`VendorId`]: Upstream vendor name
//! - [`ProductKey`]: Product lookup key (SKU)
//!
//! ## Numeric Types
//!
//! - [`Price`]: Strictly positive decimal price
//!
//! ## Time
//!
//! - [`Timestamp`]: UTC observation instant
//!
//! ## Domain Enums
//!
//! - [`StockStatus`]: In stock or out of stock
//! - [`BreakerState`]: Circuit breaker state

pub mod enums;
pub mod ids;
pub mod price;
pub mod timestamp;

pub use enums::{BreakerState, ParseEnumError, StockStatus};
pub use ids::{ProductKey, VendorId};
pub use price::Price;
pub use timestamp::Timestamp;
