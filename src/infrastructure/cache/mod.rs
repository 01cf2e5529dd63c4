//! # Result Cache
//!
//! Stores for [`AggregateResult`](crate::domain::entities::AggregateResult)
//! snapshots keyed by product.
//!
//! ## Implementations
//!
//! - [`InMemoryCacheStore`]: Process-local, lazily expired
//! - [`RedisCacheStore`]: Shared Redis instance

pub mod in_memory;
pub mod redis;
pub mod traits;

pub use in_memory::InMemoryCacheStore;
pub use self::redis::RedisCacheStore;
pub use traits::{CacheError, CacheResult, CacheStore};
