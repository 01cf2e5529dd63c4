//! # Cache Store Trait
//!
//! Port definition for the aggregate result cache.
//!
//! The cache is advisory: callers treat every [`CacheError`] as a miss
//! (reads) or a skipped write, never as a request failure.

use crate::domain::entities::aggregate_result::AggregateResult;
use crate::domain::value_objects::ProductKey;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error type for cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The store could not be reached.
    #[error("cache connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// A value could not be encoded or decoded.
    #[error("cache serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// The store rejected a command.
    #[error("cache command error: {message}")]
    Command {
        /// Error message.
        message: String,
    },

    /// The store did not answer in time.
    #[error("cache operation timed out after {timeout_ms}ms")]
    Timeout {
        /// Limit that was exceeded.
        timeout_ms: u64,
    },
}

impl CacheError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a command error.
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store for aggregate results with per-entry TTL.
#[async_trait]
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Returns the cached result for `key`, if present and not expired.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the store fails.
    async fn get(&self, key: &ProductKey) -> CacheResult<Option<AggregateResult>>;

    /// Stores `value` under `key` for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the store fails.
    async fn set(&self, key: &ProductKey, value: &AggregateResult, ttl: Duration) -> CacheResult<()>;

    /// Removes `key`, returning true if an entry existed.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the store fails.
    async fn delete(&self, key: &ProductKey) -> CacheResult<bool>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the store is unreachable.
    async fn ping(&self) -> CacheResult<()>;
}
