//! # Configuration
//!
//! Settings are layered with the `config` crate:
//!
//! 1. `.env` (via `dotenvy`), if present
//! 2. `config/default.toml`, if present
//! 3. `config/{AGGREGATOR_ENV}.toml`, if present
//! 4. Environment variables prefixed with `AGGREGATOR_`, nested with `__`
//!    (e.g. `AGGREGATOR_BREAKER__FAILURE_THRESHOLD=3`)
//!
//! Every field has a default, so an empty environment yields a working
//! configuration with three simulated vendors.
//!
//! [`AppConfig`] is loaded once and split into per-component subsets that
//! are handed over at construction time.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::infrastructure::vendors::raw::RawFormat;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AGGREGATOR";

/// Circuit breaker settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker.
    pub failure_threshold: u32,
    /// Seconds after the last failure before a probe is allowed.
    pub cooldown_secs: u64,
}

impl BreakerConfig {
    /// Returns the cooldown as a duration.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown_secs: 60,
        }
    }
}

/// Per-vendor call retry settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    /// Timeout for a single attempt.
    pub timeout_ms: u64,
    /// Total attempts per logical call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each further retry.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            max_attempts: 3,
            base_delay_ms: 100,
        }
    }
}

/// Quote selection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Percent above the cheapest price beyond which a better-stocked quote wins.
    pub price_threshold_percent: Decimal,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            price_threshold_percent: Decimal::TEN,
        }
    }
}

/// Freshness settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FreshnessConfig {
    /// Maximum tolerated quote age.
    pub max_age_secs: u64,
}

impl FreshnessConfig {
    /// Returns the maximum age as a duration.
    #[must_use]
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self { max_age_secs: 600 }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a cached result.
    pub ttl_secs: u64,
    /// Redis URL; the in-memory store is used when absent.
    pub redis_url: Option<String>,
    /// Namespace prepended to Redis keys.
    pub key_prefix: String,
    /// Upper bound on a single cache operation; a slower store counts as failed.
    pub timeout_ms: u64,
}

impl CacheConfig {
    /// Returns the TTL as a duration.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Returns the per-operation timeout as a duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            redis_url: None,
            key_prefix: "product".to_string(),
            timeout_ms: 250,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// How a vendor is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VendorKind {
    /// In-process simulated vendor.
    Simulated {
        /// Lower bound of the simulated response delay.
        #[serde(default)]
        min_delay_ms: u64,
        /// Upper bound of the simulated response delay.
        #[serde(default)]
        max_delay_ms: u64,
        /// Probability in `[0, 1]` that a call fails.
        #[serde(default)]
        failure_rate: f64,
    },
    /// Remote vendor reached over HTTP.
    Http {
        /// Base URL; products are fetched from `{base_url}/products/{key}`.
        base_url: String,
    },
}

/// A single vendor definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorConfig {
    /// Vendor name, also the circuit breaker key.
    pub name: String,
    /// Wire format of the vendor's responses.
    pub format: RawFormat,
    /// Transport.
    #[serde(flatten)]
    pub kind: VendorKind,
}

impl VendorConfig {
    /// Creates a simulated vendor definition.
    #[must_use]
    pub fn simulated(
        name: impl Into<String>,
        format: RawFormat,
        min_delay_ms: u64,
        max_delay_ms: u64,
        failure_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            kind: VendorKind::Simulated {
                min_delay_ms,
                max_delay_ms,
                failure_rate,
            },
        }
    }

    /// Creates an HTTP vendor definition.
    #[must_use]
    pub fn http(name: impl Into<String>, format: RawFormat, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format,
            kind: VendorKind::Http {
                base_url: base_url.into(),
            },
        }
    }
}

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Circuit breaker settings.
    pub breaker: BreakerConfig,
    /// Retry settings.
    pub retry: RetryConfig,
    /// Selection settings.
    pub selection: SelectionConfig,
    /// Freshness settings.
    pub freshness: FreshnessConfig,
    /// Cache settings.
    pub cache: CacheConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Vendors to aggregate over.
    pub vendors: Vec<VendorConfig>,
    /// Interval of the breaker metrics report.
    pub metrics_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            breaker: BreakerConfig::default(),
            retry: RetryConfig::default(),
            selection: SelectionConfig::default(),
            freshness: FreshnessConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            vendors: default_vendors(),
            metrics_interval_secs: 60,
        }
    }
}

/// The three simulated vendors used when none are configured.
#[must_use]
pub fn default_vendors() -> Vec<VendorConfig> {
    vec![
        VendorConfig::simulated("VendorOne", RawFormat::VendorOne, 100, 300, 0.01),
        VendorConfig::simulated("VendorTwo", RawFormat::VendorTwo, 200, 500, 0.05),
        VendorConfig::simulated("VendorThree", RawFormat::VendorThree, 300, 800, 0.10),
    ]
}

impl AppConfig {
    /// Loads configuration from `config/` and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be parsed
    /// or the result fails [`AppConfig::validate`].
    pub fn load() -> ApplicationResult<Self> {
        Self::load_from("config")
    }

    /// Loads configuration from the given directory and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be parsed
    /// or the result fails [`AppConfig::validate`].
    pub fn load_from(dir: &str) -> ApplicationResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let env = std::env::var(format!("{}_ENV", ENV_PREFIX))
            .unwrap_or_else(|_| "development".to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", dir, env)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> ApplicationResult<Self> {
        let settings = builder
            .build()
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the first invalid setting.
    pub fn validate(&self) -> ApplicationResult<()> {
        let invalid = |msg: &str| Err(ApplicationError::configuration(msg));

        if self.breaker.failure_threshold == 0 {
            return invalid("breaker.failure_threshold must be greater than zero");
        }
        if self.retry.max_attempts == 0 {
            return invalid("retry.max_attempts must be greater than zero");
        }
        if self.retry.timeout_ms == 0 {
            return invalid("retry.timeout_ms must be greater than zero");
        }
        if self.selection.price_threshold_percent.is_sign_negative() {
            return invalid("selection.price_threshold_percent must not be negative");
        }
        if self.freshness.max_age_secs == 0 {
            return invalid("freshness.max_age_secs must be greater than zero");
        }
        if self.cache.ttl_secs == 0 {
            return invalid("cache.ttl_secs must be greater than zero");
        }
        if self.cache.timeout_ms == 0 {
            return invalid("cache.timeout_ms must be greater than zero");
        }
        if self.metrics_interval_secs == 0 {
            return invalid("metrics_interval_secs must be greater than zero");
        }
        if self.vendors.is_empty() {
            return invalid("at least one vendor must be configured");
        }

        for vendor in &self.vendors {
            if vendor.name.trim().is_empty() {
                return invalid("vendor name must not be empty");
            }
            match &vendor.kind {
                VendorKind::Simulated {
                    min_delay_ms,
                    max_delay_ms,
                    failure_rate,
                } => {
                    if min_delay_ms > max_delay_ms {
                        return Err(ApplicationError::configuration(format!(
                            "vendor {}: min_delay_ms exceeds max_delay_ms",
                            vendor.name
                        )));
                    }
                    if !(0.0..=1.0).contains(failure_rate) {
                        return Err(ApplicationError::configuration(format!(
                            "vendor {}: failure_rate must be within [0, 1]",
                            vendor.name
                        )));
                    }
                }
                VendorKind::Http { base_url } => {
                    if base_url.trim().is_empty() {
                        return Err(ApplicationError::configuration(format!(
                            "vendor {}: base_url must not be empty",
                            vendor.name
                        )));
                    }
                }
            }
        }

        let mut names: Vec<&str> = self.vendors.iter().map(|v| v.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|pair| pair.first() == pair.last()) {
            return invalid("vendor names must be unique");
        }

        Ok(())
    }
}
