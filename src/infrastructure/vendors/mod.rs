//! # Vendor Gateways
//!
//! Adapters for the upstream vendors quotes are aggregated from.
//!
//! - [`traits`]: The [`VendorGateway`] port
//! - [`raw`]: Per-vendor wire formats and normalization
//! - [`simulated`]: Catalog-backed vendor with simulated latency and failures
//! - [`http_gateway`]: Remote vendor over HTTP
//! - [`http_client`]: Shared HTTP client wrapper

pub mod error;
pub mod http_client;
pub mod http_gateway;
pub mod raw;
pub mod simulated;
pub mod traits;

pub use error::{VendorError, VendorResult};
pub use http_client::HttpClient;
pub use http_gateway::HttpVendorGateway;
pub use raw::{RawFormat, RawResponse};
pub use simulated::{CatalogEntry, SimulatedVendor};
pub use traits::VendorGateway;
