//! # Timestamp Value Object
//!
//! UTC instant at which a vendor observed a price or stock level.
//!
//! # Examples
//!
//! ```
//! use vendor_aggregator::domain::value_objects::timestamp::Timestamp;
//! use std::time::Duration;
//!
//! let observed = Timestamp::parse_rfc3339("2024-11-28T10:30:00Z").unwrap();
//! let now = observed + Duration::from_secs(90);
//!
//! assert_eq!(observed.age_at(now), Duration::from_secs(90));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A UTC timestamp with microsecond-or-better precision.
///
/// Wraps `chrono::DateTime<Utc>`. Serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Parses an RFC 3339 / ISO 8601 string such as `2024-11-28T10:30:00Z`.
    ///
    /// Offsets other than UTC are converted to UTC. Returns `None` on malformed input.
    #[must_use]
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns a timestamp `micros` microseconds earlier.
    #[must_use]
    pub fn sub_micros(&self, micros: i64) -> Self {
        Self(self.0 - Duration::microseconds(micros))
    }

    /// Returns how old this timestamp is relative to `now`.
    ///
    /// Timestamps in the future of `now` have age zero.
    #[must_use]
    pub fn age_at(&self, now: Timestamp) -> std::time::Duration {
        now - *self
    }

    /// Returns true if this timestamp is at or after `other`.
    #[inline]
    #[must_use]
    pub fn is_at_or_after(&self, other: &Self) -> bool {
        self.0 >= other.0
    }

    /// Formats the timestamp as RFC 3339 with a `Z` suffix.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<std::time::Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: std::time::Duration) -> Self::Output {
        Self(self.0 + Duration::from_std(rhs).unwrap_or(Duration::zero()))
    }
}

impl Sub<std::time::Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: std::time::Duration) -> Self::Output {
        Self(self.0 - Duration::from_std(rhs).unwrap_or(Duration::zero()))
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = std::time::Duration;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        (self.0 - rhs.0)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod parsing {
        use super::*;

        #[test]
        fn parses_zulu() {
            let ts = Timestamp::parse_rfc3339("2024-01-01T00:00:00Z").unwrap();
            assert_eq!(ts.timestamp_secs(), 1_704_067_200);
        }

        #[test]
        fn normalizes_offset_to_utc() {
            let ts = Timestamp::parse_rfc3339("2024-01-01T02:00:00+02:00").unwrap();
            assert_eq!(ts.timestamp_secs(), 1_704_067_200);
        }

        #[test]
        fn rejects_garbage() {
            assert!(Timestamp::parse_rfc3339("yesterday").is_none());
            assert!(Timestamp::parse_rfc3339("2024-01-01 00:00:00").is_none());
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn std_duration_sub() {
            let ts = Timestamp::from_secs(1000).unwrap();
            let earlier = ts - std::time::Duration::from_secs(60);
            assert_eq!(earlier.timestamp_secs(), 940);
        }

        #[test]
        fn sub_micros_is_strictly_earlier() {
            let ts = Timestamp::from_millis(1_704_067_200_000).unwrap();
            let earlier = ts.sub_micros(1);
            assert!(earlier < ts);
            assert!(!earlier.is_at_or_after(&ts));
            assert!(ts.is_at_or_after(&ts));
        }

        #[test]
        fn age_never_negative() {
            let now = Timestamp::from_secs(1000).unwrap();
            let future = Timestamp::from_secs(1060).unwrap();
            assert_eq!(future.age_at(now), std::time::Duration::ZERO);
            assert_eq!(now.age_at(future).as_secs(), 60);
        }
    }

    #[test]
    fn serde_roundtrip_keeps_precision() {
        let ts = Timestamp::from_millis(1_704_067_200_123).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-01"));
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }

    #[test]
    fn display_is_iso8601_utc() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        assert_eq!(ts.to_string(), "2024-01-01T00:00:00Z");
    }
}
