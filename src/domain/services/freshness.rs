//! # Freshness Filter
//!
//! Drops quotes whose observation timestamp is older than a configured age.
//!
//! The boundary is inclusive: a quote observed exactly `max_age` before `now`
//! is kept, one observed a microsecond earlier is dropped.

use crate::domain::entities::quote::Quote;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::Timestamp;
use std::time::Duration;

/// Filters quotes by age relative to an explicit `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessFilter {
    max_age: Duration,
}

impl FreshnessFilter {
    /// Creates a filter with the given maximum age.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfiguration` if `max_age` is zero.
    pub fn new(max_age: Duration) -> DomainResult<Self> {
        if max_age.is_zero() {
            return Err(DomainError::invalid_configuration(
                "freshness max age must be greater than zero",
            ));
        }
        Ok(Self { max_age })
    }

    /// Returns the maximum tolerated age.
    #[inline]
    #[must_use]
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Returns the oldest observation instant still considered fresh.
    #[must_use]
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now - self.max_age
    }

    /// Returns true if `quote` was observed at or after the cutoff.
    #[must_use]
    pub fn is_fresh(&self, quote: &Quote, now: Timestamp) -> bool {
        quote.observed_at().is_at_or_after(&self.cutoff(now))
    }

    /// Splits quotes into `(fresh, stale)`, preserving input order in both.
    #[must_use]
    pub fn partition(&self, quotes: Vec<Quote>, now: Timestamp) -> (Vec<Quote>, Vec<Quote>) {
        let cutoff = self.cutoff(now);
        quotes
            .into_iter()
            .partition(|quote| quote.observed_at().is_at_or_after(&cutoff))
    }

    /// Returns only the fresh quotes, in input order.
    #[must_use]
    pub fn filter(&self, quotes: Vec<Quote>, now: Timestamp) -> Vec<Quote> {
        self.partition(quotes, now).0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Price, ProductKey, VendorId};
    use proptest::prelude::*;

    const MAX_AGE: Duration = Duration::from_secs(600);

    fn quote_at(vendor: &str, observed_at: Timestamp) -> Quote {
        Quote::new(
            VendorId::new(vendor),
            ProductKey::new("ABC123"),
            Price::new(10.0).unwrap(),
            3,
            observed_at,
        )
    }

    fn now() -> Timestamp {
        Timestamp::from_millis(1_732_789_800_000).unwrap()
    }

    #[test]
    fn rejects_zero_max_age() {
        assert!(FreshnessFilter::new(Duration::ZERO).is_err());
    }

    #[test]
    fn boundary_is_inclusive() {
        let filter = FreshnessFilter::new(MAX_AGE).unwrap();
        let cutoff = filter.cutoff(now());

        let at_boundary = quote_at("VendorOne", cutoff);
        let just_older = quote_at("VendorTwo", cutoff.sub_micros(1));

        assert!(filter.is_fresh(&at_boundary, now()));
        assert!(!filter.is_fresh(&just_older, now()));

        let kept = filter.filter(vec![at_boundary, just_older], now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].vendor_id().as_str(), "VendorOne");
    }

    #[test]
    fn future_quotes_are_fresh() {
        let filter = FreshnessFilter::new(MAX_AGE).unwrap();
        let ahead = quote_at("VendorOne", now() + Duration::from_secs(5));
        assert!(filter.is_fresh(&ahead, now()));
    }

    #[test]
    fn partition_reports_stale() {
        let filter = FreshnessFilter::new(MAX_AGE).unwrap();
        let quotes = vec![
            quote_at("VendorOne", now()),
            quote_at("VendorTwo", now() - Duration::from_secs(900)),
            quote_at("VendorThree", now() - Duration::from_secs(30)),
        ];

        let (fresh, stale) = filter.partition(quotes, now());
        let fresh: Vec<_> = fresh.iter().map(|q| q.vendor_id().as_str()).collect();
        assert_eq!(fresh, vec!["VendorOne", "VendorThree"]);
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].vendor_id().as_str(), "VendorTwo");
    }

    proptest! {
        #[test]
        fn prop_keeps_exactly_quotes_within_age(ages in proptest::collection::vec(0u64..1_200, 0..20)) {
            let filter = FreshnessFilter::new(MAX_AGE).unwrap();
            let quotes: Vec<Quote> = ages
                .iter()
                .enumerate()
                .map(|(i, age)| quote_at(&format!("V{}", i), now() - Duration::from_secs(*age)))
                .collect();

            let kept = filter.filter(quotes, now());
            let expected: Vec<String> = ages
                .iter()
                .enumerate()
                .filter(|(_, age)| **age <= MAX_AGE.as_secs())
                .map(|(i, _)| format!("V{}", i))
                .collect();
            let actual: Vec<String> = kept.iter().map(|q| q.vendor_id().to_string()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
