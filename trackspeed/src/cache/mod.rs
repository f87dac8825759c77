//! Persistent speed limit cache.
//!
//! This module is split into two layers:
//!
//! - **Stores** ([`KeyValueStore`]): generic string key-value backends with
//!   size limits ([`MemoryStoreProvider`], [`DiskStoreProvider`]).
//! - **Client** ([`SpeedLimitCache`]): maps coordinates to namespaced keys,
//!   serializes entries and applies the expiry window.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trackspeed::cache::{DiskStoreProvider, SpeedLimitCache};
//!
//! let store = DiskStoreProvider::open("/tmp/trackspeed", 10 * 1024 * 1024).await?;
//! let cache = SpeedLimitCache::new(store);
//! cache.prune_expired().await;
//!
//! cache.store_limit(52.52, 13.405, 50).await;
//! assert_eq!(cache.lookup(52.52, 13.405).await.map(|e| e.limit_kmh), Some(50));
//! ```

mod providers;
mod speed_limit;
mod traits;

pub use providers::{DiskStoreProvider, MemoryStoreProvider, MAX_DISK_KEY_BYTES};
pub use speed_limit::{
    CacheEntry, SpeedLimitCache, StoreOutcome, CACHED_UNIT, DEFAULT_CACHE_TTL, DEFAULT_KEY_PREFIX,
};
pub use traits::{BoxFuture, KeyValueStore, PruneResult, StoreError, MAX_KEY_BYTES};
