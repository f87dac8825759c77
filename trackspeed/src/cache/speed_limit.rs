//! Speed limit cache client.
//!
//! This client wraps a generic `KeyValueStore` with:
//! - Key translation: `(lat, lng)` → `"speedlimit:{lat:.5},{lng:.5}"`
//! - Entry serialization: `{"limit":50,"unit":"kmph","fetched":1714557600000}`
//! - Expiry: entries older than the TTL are reported as misses
//!
//! # Key Format
//!
//! Coordinates are rounded to 5 decimal places (~1 m), so near-duplicate
//! points from different tracks share an entry. The key depends on the
//! rounded coordinates only.
//! Example: `speedlimit:52.52000,13.40500`
//!
//! # Best Effort
//!
//! Store errors never propagate. A failed read is a miss, a failed write
//! is logged and reported through [`StoreOutcome`]. Expired and corrupt
//! entries are only deleted by [`SpeedLimitCache::prune_expired`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::traits::{KeyValueStore, PruneResult};
use crate::geo::round_coord;

/// Default namespace prefix for speed limit entries.
pub const DEFAULT_KEY_PREFIX: &str = "speedlimit:";

/// Default expiry window for cached limits (30 days).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Unit recorded for every cached limit.
pub const CACHED_UNIT: &str = "kmph";

/// A cached speed limit as stored in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Speed limit in km/h.
    #[serde(rename = "limit")]
    pub limit_kmh: u32,
    /// Unit of `limit_kmh`, always `"kmph"`.
    pub unit: String,
    /// When the limit was fetched from the provider (Unix epoch ms).
    #[serde(rename = "fetched")]
    pub fetched_at_ms: i64,
}

impl CacheEntry {
    /// Create an entry fetched at the given time.
    pub fn new(limit_kmh: u32, fetched_at_ms: i64) -> Self {
        Self {
            limit_kmh,
            unit: CACHED_UNIT.to_string(),
            fetched_at_ms,
        }
    }

    /// Whether the entry is older than `ttl` at `now_ms`.
    pub fn is_expired(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.fetched_at_ms) > ttl_ms
    }
}

/// Outcome of a best-effort cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The entry was written.
    Stored,
    /// The store rejected the write; the cache is merely colder.
    Skipped,
}

/// Cache client for per-coordinate speed limits.
pub struct SpeedLimitCache {
    /// The underlying generic store.
    store: Arc<dyn KeyValueStore>,

    /// Namespace prefix for keys owned by this cache.
    prefix: String,

    /// Expiry window.
    ttl: Duration,
}

impl SpeedLimitCache {
    /// Create a cache with the default prefix and 30-day expiry.
    ///
    /// # Arguments
    ///
    /// * `store` - The underlying key-value store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_settings(store, DEFAULT_KEY_PREFIX, DEFAULT_CACHE_TTL)
    }

    /// Create a cache with a custom prefix and expiry window.
    pub fn with_settings(
        store: Arc<dyn KeyValueStore>,
        prefix: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Build the cache key for a coordinate pair.
    pub fn key_for(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}{:.5},{:.5}",
            self.prefix,
            round_coord(lat),
            round_coord(lng)
        )
    }

    /// Look up a cached limit using the current time.
    pub async fn lookup(&self, lat: f64, lng: f64) -> Option<CacheEntry> {
        self.lookup_at(lat, lng, now_ms()).await
    }

    /// Look up a cached limit as of `now_ms`.
    ///
    /// Absent, unparsable and expired entries are all misses.
    pub async fn lookup_at(&self, lat: f64, lng: f64, now_ms: i64) -> Option<CacheEntry> {
        let key = self.key_for(lat, lng);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, key = %key, "Speed limit cache get failed");
                return None;
            }
        };

        let entry = parse_entry(&raw)?;
        if entry.is_expired(now_ms, self.ttl) {
            debug!(key = %key, fetched = entry.fetched_at_ms, "Cached speed limit expired");
            return None;
        }

        Some(entry)
    }

    /// Cache a limit using the current time.
    pub async fn store_limit(&self, lat: f64, lng: f64, limit_kmh: u32) -> StoreOutcome {
        self.store_limit_at(lat, lng, limit_kmh, now_ms()).await
    }

    /// Cache a limit fetched at `fetched_at_ms`.
    ///
    /// Write failures (quota, I/O) are logged and swallowed.
    pub async fn store_limit_at(
        &self,
        lat: f64,
        lng: f64,
        limit_kmh: u32,
        fetched_at_ms: i64,
    ) -> StoreOutcome {
        let key = self.key_for(lat, lng);
        let entry = CacheEntry::new(limit_kmh, fetched_at_ms);

        let value = match serde_json::to_string(&entry) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, key = %key, "Failed to serialize cache entry");
                return StoreOutcome::Skipped;
            }
        };

        match self.store.set(&key, value).await {
            Ok(()) => StoreOutcome::Stored,
            Err(e) => {
                debug!(error = %e, key = %key, "Speed limit cache set failed");
                StoreOutcome::Skipped
            }
        }
    }

    /// Remove expired and unparsable entries using the current time.
    pub async fn prune_expired(&self) -> PruneResult {
        self.prune_expired_at(now_ms()).await
    }

    /// Remove expired and unparsable entries as of `now_ms`.
    ///
    /// Only keys under this cache's prefix are inspected. This is the only
    /// operation that deletes entries from the store.
    pub async fn prune_expired_at(&self, now_ms: i64) -> PruneResult {
        let mut result = PruneResult::default();

        let keys = match self.store.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Failed to enumerate speed limit cache");
                return result;
            }
        };

        for key in keys.iter().filter(|k| k.starts_with(&self.prefix)) {
            result.entries_scanned += 1;

            let entry = match self.store.get(key).await {
                Ok(Some(raw)) => parse_entry(&raw),
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, key = %key, "Failed to read cache entry during prune");
                    continue;
                }
            };

            let corrupt = entry.is_none();
            let expired = entry.is_some_and(|e| e.is_expired(now_ms, self.ttl));
            if !corrupt && !expired {
                continue;
            }

            match self.store.delete(key).await {
                Ok(true) if corrupt => result.corrupt_removed += 1,
                Ok(true) => result.expired_removed += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, key = %key, "Failed to delete cache entry"),
            }
        }

        if result.removed() > 0 {
            info!(
                scanned = result.entries_scanned,
                expired = result.expired_removed,
                corrupt = result.corrupt_removed,
                "Pruned speed limit cache"
            );
        }

        result
    }
}

fn parse_entry(raw: &str) -> Option<CacheEntry> {
    serde_json::from_str(raw).ok()
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
