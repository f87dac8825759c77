//! Core traits for the persistent key-value store.
//!
//! The `KeyValueStore` trait provides a domain-agnostic string key-value
//! interface. Store providers implement it, and the speed-limit cache layer
//! sits on top without knowing which backend holds the data.
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable for debugging, namespaced by prefix
//! - **String values**: Entries are serialized JSON documents
//! - **Size limits**: Writes that would exceed the quota fail instead of evicting
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support
//!
//! # Example
//!
//! ```ignore
//! use trackspeed::cache::{KeyValueStore, MemoryStoreProvider};
//!
//! let store = MemoryStoreProvider::new(1024 * 1024);
//! store.set("speedlimit:52.52000,13.40500", "{...}".to_string()).await?;
//! let value = store.get("speedlimit:52.52000,13.40500").await?;
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Maximum key length accepted by store providers.
pub const MAX_KEY_BYTES: usize = 256;

/// Result of pruning expired or corrupt entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneResult {
    /// Number of namespaced entries inspected.
    pub entries_scanned: usize,
    /// Entries removed because they were older than the expiry window.
    pub expired_removed: usize,
    /// Entries removed because they could not be parsed.
    pub corrupt_removed: usize,
}

impl PruneResult {
    /// Total number of entries removed.
    pub fn removed(&self) -> usize {
        self.expired_removed + self.corrupt_removed
    }
}

impl fmt::Display for PruneResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Prune: scanned {} entries, removed {} expired and {} corrupt",
            self.entries_scanned, self.expired_removed, self.corrupt_removed
        )
    }
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during store operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The write would exceed the store's size limit.
    #[error("Quota exceeded: need {needed} bytes, {available} available")]
    QuotaExceeded { needed: u64, available: u64 },

    /// Key exceeds maximum allowed size.
    #[error("Key too large: {size} bytes (max: {max})")]
    KeyTooLarge { size: usize, max: usize },

    /// Key cannot be represented by this store.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic interface for persistent string key-value storage.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Independent keys may be read
/// and written concurrently without external locking.
///
/// # Size Limits
///
/// Every provider has a byte quota. A `set()` that would push the store over
/// its quota returns [`StoreError::QuotaExceeded`] and leaves the store
/// unchanged. Callers that treat the store as best-effort are expected to
/// ignore the error.
pub trait KeyValueStore: Send + Sync {
    /// Store a value under the given key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if:
    /// - I/O fails (disk stores)
    /// - The key is too large or not representable
    /// - The write would exceed the size limit
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>>;

    /// Delete a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the key existed and was deleted
    /// - `Ok(false)` if the key did not exist
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>>;

    /// Enumerate every key currently held by the store.
    ///
    /// Keys are returned in no particular order and may include entries
    /// written by unrelated users of the same store.
    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, StoreError>>;

    /// Get the current number of entries in the store.
    fn entry_count(&self) -> u64;

    /// Get the current size of the store in bytes (keys plus values).
    fn size_bytes(&self) -> u64;

    /// Get the maximum configured size in bytes.
    fn max_size_bytes(&self) -> u64;
}

/// Reject keys that no provider should accept.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("empty key".to_string()));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(StoreError::KeyTooLarge {
            size: key.len(),
            max: MAX_KEY_BYTES,
        });
    }
    Ok(())
}
