//! # In-Memory Cache Store
//!
//! Process-local [`CacheStore`] backed by a `DashMap`. Entries expire lazily:
//! an expired entry is removed the next time it is read.

use crate::domain::entities::aggregate_result::AggregateResult;
use crate::domain::value_objects::ProductKey;
use crate::infrastructure::cache::traits::{CacheResult, CacheStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: AggregateResult,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory implementation of [`CacheStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStore {
    entries: Arc<DashMap<ProductKey, CacheEntry>>,
}

impl InMemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &ProductKey) -> CacheResult<Option<AggregateResult>> {
        let now = Instant::now();
        {
            if let Some(entry) = self.entries.get(key) {
                if !entry.is_expired(now) {
                    return Ok(Some(entry.value.clone()));
                }
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn set(&self, key: &ProductKey, value: &AggregateResult, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value: value.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &ProductKey) -> CacheResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}
