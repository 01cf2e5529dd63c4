//! # Domain Layer
//!
//! Core types and pure business rules, free of I/O.
//!
//! - [`entities`]: Quotes and aggregate results
//! - [`value_objects`]: Identifiers, prices, timestamps and enums
//! - [`services`]: Freshness filtering and quote selection
//! - [`errors`]: Domain invariant violations

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
