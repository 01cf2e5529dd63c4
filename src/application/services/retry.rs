//! # Retry Executor
//!
//! Wraps one logical vendor call with a per-attempt timeout and bounded
//! exponential backoff, gated by the vendor's circuit breaker.
//!
//! The breaker hears about each logical call at most once:
//! `record_success` when a quote arrives, `record_failure` when every
//! attempt has failed. Retried intermediate failures, "not found" answers
//! and calls rejected by an open breaker are not reported.

use crate::application::services::circuit_breaker::CircuitBreaker;
use crate::config::RetryConfig;
use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::ProductKey;
use crate::infrastructure::vendors::error::VendorError;
use crate::infrastructure::vendors::traits::VendorGateway;
use std::time::Duration;
use thiserror::Error;

/// Timeout and backoff settings for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    timeout: Duration,
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` counts the first attempt and is at least one.
    #[must_use]
    pub fn new(timeout: Duration, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            timeout,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Builds a policy from configuration.
    #[must_use]
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.timeout_ms),
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
        )
    }

    /// Returns the per-attempt timeout.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the total number of attempts.
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the wait after failed attempt number `attempt` (1-based):
    /// `base_delay * 2^(attempt - 1)`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Why a logical call produced no quote.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    /// The breaker rejected the call; the vendor was not contacted.
    #[error("circuit open")]
    CircuitOpen,

    /// Every attempt failed.
    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last_error: VendorError,
    },
}

/// Outcome of one logical vendor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The vendor returned a quote.
    Found(Quote),
    /// The vendor has no record for the key.
    NotFound,
    /// No quote could be obtained.
    Failed(CallFailure),
}

impl CallOutcome {
    /// Returns true if a quote was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Executes vendor calls under a [`RetryPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Creates an executor.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `key` from `gateway`, retrying failures and timeouts.
    pub async fn execute(
        &self,
        gateway: &dyn VendorGateway,
        breaker: &CircuitBreaker,
        key: &ProductKey,
    ) -> CallOutcome {
        let vendor = gateway.vendor_id();

        if !breaker.can_execute() {
            tracing::debug!(vendor = %vendor, key = %key, "Skipping vendor, circuit open");
            return CallOutcome::Failed(CallFailure::CircuitOpen);
        }

        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);

            let result = match tokio::time::timeout(self.policy.timeout, gateway.fetch(key)).await {
                Ok(result) => result,
                Err(_) => Err(VendorError::timeout_with_duration(
                    format!("{} did not answer in time", vendor),
                    u64::try_from(self.policy.timeout.as_millis()).unwrap_or(u64::MAX),
                )),
            };

            match result {
                Ok(Some(quote)) => {
                    breaker.record_success();
                    if attempt > 1 {
                        tracing::info!(vendor = %vendor, key = %key, attempt, "Vendor call succeeded after retry");
                    }
                    return CallOutcome::Found(quote);
                }
                Ok(None) => {
                    tracing::debug!(vendor = %vendor, key = %key, "Vendor has no record");
                    return CallOutcome::NotFound;
                }
                Err(error) if attempt >= self.policy.max_attempts => {
                    breaker.record_failure();
                    tracing::error!(
                        vendor = %vendor,
                        key = %key,
                        attempts = attempt,
                        error = %error,
                        "Vendor call failed, retries exhausted"
                    );
                    return CallOutcome::Failed(CallFailure::MaxRetriesExceeded {
                        attempts: attempt,
                        last_error: error,
                    });
                }
                Err(error) => {
                    let delay = self.policy.delay_after(attempt);
                    tracing::warn!(
                        vendor = %vendor,
                        key = %key,
                        attempt,
                        retryable = error.is_retryable(),
                        retry_after_ms = ?error.retry_after_ms(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "Vendor call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
