//! # Domain Entities
//!
//! ## Entities
//!
//! - [`Quote`]: Normalized price and stock answer from one vendor
//! - [`AggregateResult`]: The answer surfaced for a product key

pub mod aggregate_result;
pub mod quote;

pub use aggregate_result::{AggregateResult, UNAVAILABLE_MESSAGE};
pub use quote::Quote;
