//! # Quote Selection
//!
//! Picks the single best quote from a set of fresh quotes.
//!
//! This module provides the [`QuoteSelector`] trait and the default
//! [`SelectionPolicy`], which favors price but lets a quote with materially
//! more stock win when the cheapest quote is priced far below the rest.
//!
//! # Examples
//!
//! ```
//! use vendor_aggregator::domain::entities::quote::Quote;
//! use vendor_aggregator::domain::services::selection::{QuoteSelector, SelectionPolicy};
//! use vendor_aggregator::domain::value_objects::{Price, ProductKey, Timestamp, VendorId};
//!
//! let now = Timestamp::now();
//! let quote = |vendor: &str, price: f64, stock: u32| {
//!     Quote::new(VendorId::new(vendor), ProductKey::new("ABC123"), Price::new(price).unwrap(), stock, now)
//! };
//!
//! let quotes = vec![quote("A", 100.0, 5), quote("B", 115.0, 50)];
//! let selected = SelectionPolicy::default().select(&quotes).unwrap();
//! assert_eq!(selected.vendor_id().as_str(), "B");
//! ```

use crate::domain::entities::quote::Quote;
use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use std::fmt;

/// Default percent above the cheapest price at which a better-stocked quote may win.
pub const DEFAULT_PRICE_THRESHOLD_PERCENT: Decimal = Decimal::TEN;

/// Trait for quote selection rules.
pub trait QuoteSelector: Send + Sync + fmt::Debug {
    /// Selects the best quote, or `None` if no quote is sellable.
    fn select<'a>(&self, quotes: &'a [Quote]) -> Option<&'a Quote>;

    /// Returns the name of this selection rule.
    fn name(&self) -> &'static str;
}

/// Price-first selection with a stock override.
///
/// 1. Quotes with no stock are discarded.
/// 2. The rest are ordered by price ascending (stable, so equal prices keep
///    their input order).
/// 3. Scanning upwards from the cheapest, the first quote priced more than
///    `price_threshold_percent` above the cheapest AND holding strictly more
///    stock than it wins.
/// 4. Otherwise the cheapest wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    price_threshold_percent: Decimal,
}

impl SelectionPolicy {
    /// Creates a policy with the given threshold.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfiguration` if the threshold is negative.
    pub fn new(price_threshold_percent: Decimal) -> DomainResult<Self> {
        if price_threshold_percent.is_sign_negative() {
            return Err(DomainError::invalid_configuration(format!(
                "price threshold must not be negative, got {}",
                price_threshold_percent
            )));
        }
        Ok(Self {
            price_threshold_percent,
        })
    }

    /// Returns the configured threshold.
    #[inline]
    #[must_use]
    pub fn price_threshold_percent(&self) -> Decimal {
        self.price_threshold_percent
    }

    fn exceeds_threshold(&self, candidate: &Quote, cheapest: &Quote) -> bool {
        // An overflowing difference is far above any sane threshold.
        candidate
            .price()
            .percent_above(&cheapest.price())
            .map_or(true, |diff| diff > self.price_threshold_percent)
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            price_threshold_percent: DEFAULT_PRICE_THRESHOLD_PERCENT,
        }
    }
}

impl QuoteSelector for SelectionPolicy {
    fn select<'a>(&self, quotes: &'a [Quote]) -> Option<&'a Quote> {
        let mut available: Vec<&Quote> = quotes.iter().filter(|q| q.is_available()).collect();
        available.sort_by_key(|q| q.price());

        let (cheapest, rest) = available.split_first()?;

        let override_quote = rest
            .iter()
            .find(|q| q.stock() > cheapest.stock() && self.exceeds_threshold(q, cheapest));

        match override_quote {
            Some(winner) => {
                tracing::info!(
                    cheapest = %cheapest.vendor_id(),
                    selected = %winner.vendor_id(),
                    cheapest_stock = cheapest.stock(),
                    selected_stock = winner.stock(),
                    "Selected higher-stock quote over cheapest"
                );
                Some(*winner)
            }
            None => Some(*cheapest),
        }
    }

    fn name(&self) -> &'static str {
        "PriceWithStockOverride"
    }
}
