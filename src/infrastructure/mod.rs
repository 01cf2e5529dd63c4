//! # Infrastructure Layer
//!
//! Adapters to external systems.
//!
//! - [`vendors`]: Upstream vendor gateways
//! - [`cache`]: Aggregate result stores

pub mod cache;
pub mod vendors;
