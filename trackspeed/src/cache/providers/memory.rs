//! In-memory store provider using dashmap.
//!
//! This provider keeps entries in a sharded concurrent map. It is used for
//! tests and for short-lived runs where persistence is not needed.
//!
//! # Size Limit
//!
//! Unlike an LRU cache, this provider never evicts. A write that would push
//! the total size of keys and values over the limit is rejected with
//! [`StoreError::QuotaExceeded`], mirroring the behaviour of browser-style
//! storage quotas.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::cache::traits::{validate_key, BoxFuture, KeyValueStore, StoreError};

/// In-memory store provider using dashmap.
pub struct MemoryStoreProvider {
    /// The underlying concurrent map.
    entries: DashMap<String, String>,

    /// Current size of keys plus values in bytes.
    size_bytes: AtomicU64,

    /// Maximum size in bytes.
    max_size_bytes: u64,
}

impl MemoryStoreProvider {
    /// Create a new memory store provider.
    ///
    /// # Arguments
    ///
    /// * `max_size_bytes` - Maximum total size of keys and values in bytes
    pub fn new(max_size_bytes: u64) -> Self {
        Self {
            entries: DashMap::new(),
            size_bytes: AtomicU64::new(0),
            max_size_bytes,
        }
    }

    fn set_sync(&self, key: &str, value: String) -> Result<(), StoreError> {
        validate_key(key)?;

        let new_size = (key.len() + value.len()) as u64;

        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let old_size = (key.len() + occupied.get().len()) as u64;
                let base = self.size_bytes.load(Ordering::Relaxed).saturating_sub(old_size);
                if base + new_size > self.max_size_bytes {
                    return Err(StoreError::QuotaExceeded {
                        needed: new_size,
                        available: self.max_size_bytes.saturating_sub(base),
                    });
                }
                occupied.insert(value);
                self.size_bytes.fetch_sub(old_size, Ordering::Relaxed);
                self.size_bytes.fetch_add(new_size, Ordering::Relaxed);
            }
            Entry::Vacant(vacant) => {
                let current = self.size_bytes.load(Ordering::Relaxed);
                if current + new_size > self.max_size_bytes {
                    return Err(StoreError::QuotaExceeded {
                        needed: new_size,
                        available: self.max_size_bytes.saturating_sub(current),
                    });
                }
                vacant.insert(value);
                self.size_bytes.fetch_add(new_size, Ordering::Relaxed);
            }
        }

        Ok(())
    }
}

impl KeyValueStore for MemoryStoreProvider {
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>> {
        let result = self.set_sync(key, value);
        Box::pin(async move { result })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let value = self.entries.get(key).map(|v| v.value().clone());
        Box::pin(async move { Ok(value) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let removed = self.entries.remove(key);
        if let Some((k, v)) = &removed {
            self.size_bytes
                .fetch_sub((k.len() + v.len()) as u64, Ordering::Relaxed);
        }
        Box::pin(async move { Ok(removed.is_some()) })
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, StoreError>> {
        let keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        Box::pin(async move { Ok(keys) })
    }

    fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes.load(Ordering::Relaxed)
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_new() {
        let provider = MemoryStoreProvider::new(1_000_000);
        assert_eq!(provider.max_size_bytes(), 1_000_000);
        assert_eq!(provider.entry_count(), 0);
        assert_eq!(provider.size_bytes(), 0);
    }

    #[tokio::test]
    async fn test_memory_provider_set_and_get() {
        let provider = MemoryStoreProvider::new(1_000_000);

        provider.set("key1", "value".to_string()).await.unwrap();

        let value = provider.get("key1").await.unwrap();
        assert_eq!(value.as_deref(), Some("value"));
        assert_eq!(provider.size_bytes(), 9);
    }

    #[tokio::test]
    async fn test_memory_provider_get_missing() {
        let provider = MemoryStoreProvider::new(1_000_000);

        let value = provider.get("nonexistent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_memory_provider_delete() {
        let provider = MemoryStoreProvider::new(1_000_000);

        provider.set("key1", "abc".to_string()).await.unwrap();
        assert!(provider.delete("key1").await.unwrap());
        assert!(!provider.delete("key1").await.unwrap());
        assert_eq!(provider.size_bytes(), 0);
        assert_eq!(provider.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_provider_overwrite_tracks_size() {
        let provider = MemoryStoreProvider::new(1_000_000);

        provider.set("k", "long value".to_string()).await.unwrap();
        provider.set("k", "short".to_string()).await.unwrap();

        assert_eq!(provider.entry_count(), 1);
        assert_eq!(provider.size_bytes(), 6);
    }

    #[tokio::test]
    async fn test_memory_provider_keys() {
        let provider = MemoryStoreProvider::new(1_000_000);

        provider.set("a", "1".to_string()).await.unwrap();
        provider.set("b", "2".to_string()).await.unwrap();

        let mut keys = provider.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_provider_quota_exceeded() {
        let provider = MemoryStoreProvider::new(10);

        provider.set("key", "1234".to_string()).await.unwrap();
        let result = provider.set("other", "123456".to_string()).await;

        assert!(matches!(
            result,
            Err(StoreError::QuotaExceeded {
                needed: 11,
                available: 3
            })
        ));
        assert!(provider.get("other").await.unwrap().is_none());
        assert_eq!(provider.size_bytes(), 7);
    }

    #[tokio::test]
    async fn test_memory_provider_rejects_empty_key() {
        let provider = MemoryStoreProvider::new(100);
        let result = provider.set("", "x".to_string()).await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
    }
}
