//! # Redis Cache Store
//!
//! [`CacheStore`] backed by Redis through a multiplexed
//! `ConnectionManager`. Values are stored as JSON under
//! `"{prefix}:{key}"` with `SET ... EX ttl`.

use crate::domain::entities::aggregate_result::AggregateResult;
use crate::domain::value_objects::ProductKey;
use crate::infrastructure::cache::traits::{CacheError, CacheResult, CacheStore};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use std::fmt;
use std::time::Duration;

/// Redis implementation of [`CacheStore`].
#[derive(Clone)]
pub struct RedisCacheStore {
    manager: ConnectionManager,
    key_prefix: String,
}

impl fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisCacheStore {
    /// Connects to Redis at `url`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> CacheResult<Self> {
        let client = Client::open(url).map_err(|e| CacheError::connection(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::connection(e.to_string()))?;

        let store = Self {
            manager,
            key_prefix: key_prefix.into(),
        };
        tracing::info!(prefix = %store.key_prefix, "Connected to Redis");
        Ok(store)
    }

    /// Returns the namespaced Redis key for `key`.
    #[must_use]
    pub fn redis_key(&self, key: &ProductKey) -> String {
        namespaced(&self.key_prefix, key)
    }
}

fn namespaced(prefix: &str, key: &ProductKey) -> String {
    format!("{}:{}", prefix, key)
}

fn command_error(error: RedisError) -> CacheError {
    CacheError::command(error.to_string())
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &ProductKey) -> CacheResult<Option<AggregateResult>> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(self.redis_key(key))
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;

        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| CacheError::serialization(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, key: &ProductKey, value: &AggregateResult, ttl: Duration) -> CacheResult<()> {
        let json =
            serde_json::to_string(value).map_err(|e| CacheError::serialization(e.to_string()))?;
        let ttl_secs = ttl.as_secs().max(1);

        let mut conn = self.manager.clone();
        let _: () = redis::cmd("SET")
            .arg(self.redis_key(key))
            .arg(json)
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;
        Ok(())
    }

    async fn delete(&self, key: &ProductKey) -> CacheResult<bool> {
        let mut conn = self.manager.clone();
        let removed: u64 = redis::cmd("DEL")
            .arg(self.redis_key(key))
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;
        Ok(removed > 0)
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(
            namespaced("product", &ProductKey::new("ABC123")),
            "product:ABC123"
        );
    }

    #[tokio::test]
    async fn invalid_url_is_connection_error() {
        let err = RedisCacheStore::connect("not-a-redis-url", "product")
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Connection { .. }));
    }
}
