//! # Domain Services
//!
//! Pure functions over quotes that don't belong to a single entity.
//!
//! ## Services
//!
//! - [`FreshnessFilter`]: Discards quotes older than a configured age
//! - [`SelectionPolicy`]: Picks the best quote by price with a stock override

pub mod freshness;
pub mod selection;

pub use freshness::FreshnessFilter;
pub use selection::{DEFAULT_PRICE_THRESHOLD_PERCENT, QuoteSelector, SelectionPolicy};
