//! On-disk store provider.
//!
//! Stores each entry as a file inside the store directory. The file name is
//! the hex-encoded key, so keys can be recovered by listing the directory
//! without opening any file.
//!
//! # File Layout
//!
//! ```text
//! {store_dir}/{hex(key)}.entry
//! ```
//!
//! Writes go to a uniquely named temporary file first and are renamed into
//! place, so a crash mid-write never leaves a truncated entry behind.
//! Writes and deletes are serialized so size accounting stays exact when
//! several tasks write the same key.
//!
//! # Size Limit
//!
//! The provider tracks the total size of keys and values. The size is
//! scanned once when the store is opened and then updated on every write
//! and delete. Writes that would exceed the limit are rejected with
//! [`StoreError::QuotaExceeded`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::traits::{validate_key, BoxFuture, KeyValueStore, StoreError};

/// File extension for committed entries.
const ENTRY_EXTENSION: &str = "entry";

/// File extension for in-flight writes.
const TEMP_EXTENSION: &str = "tmp";

/// Longest key whose hex file name fits common 255-byte name limits.
pub const MAX_DISK_KEY_BYTES: usize = 120;

/// On-disk store provider.
pub struct DiskStoreProvider {
    /// Store directory path.
    directory: PathBuf,

    /// Maximum size in bytes.
    max_size_bytes: u64,

    /// Current size of keys plus values in bytes.
    size_bytes: AtomicU64,

    /// Current entry count.
    entry_count: AtomicU64,

    /// Held across check, write and accounting of a mutation.
    write_lock: Mutex<()>,

    /// Suffix source for temporary file names.
    temp_counter: AtomicU64,
}

impl DiskStoreProvider {
    /// Open a disk store, creating the directory if needed.
    ///
    /// Scans existing entries to initialise size accounting. Leftover
    /// temporary files from interrupted writes are removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or listed.
    pub async fn open(
        directory: impl Into<PathBuf>,
        max_size_bytes: u64,
    ) -> Result<Arc<Self>, StoreError> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await?;

        let mut size = 0u64;
        let mut count = 0u64;
        let mut dir = tokio::fs::read_dir(&directory).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some(ENTRY_EXTENSION) => {
                    let Some(key) = key_from_path(&path) else {
                        continue;
                    };
                    let metadata = entry.metadata().await?;
                    size += key.len() as u64 + metadata.len();
                    count += 1;
                }
                Some(TEMP_EXTENSION) => {
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        warn!(path = %path.display(), error = %e, "Failed to remove stale temp file");
                    }
                }
                _ => {}
            }
        }

        info!(
            dir = %directory.display(),
            entries = count,
            size_bytes = size,
            max_bytes = max_size_bytes,
            "Disk store opened"
        );

        Ok(Arc::new(Self {
            directory,
            max_size_bytes,
            size_bytes: AtomicU64::new(size),
            entry_count: AtomicU64::new(count),
            write_lock: Mutex::new(()),
            temp_counter: AtomicU64::new(0),
        }))
    }

    /// Directory holding the store's files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", hex::encode(key), ENTRY_EXTENSION))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.directory
            .join(format!("{}.{}.{}", hex::encode(key), n, TEMP_EXTENSION))
    }

    async fn existing_len(path: &Path) -> Result<Option<u64>, StoreError> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(Some(metadata.len())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn set_impl(&self, key: String, value: String) -> Result<(), StoreError> {
        validate_key(&key)?;
        if key.len() > MAX_DISK_KEY_BYTES {
            return Err(StoreError::KeyTooLarge {
                size: key.len(),
                max: MAX_DISK_KEY_BYTES,
            });
        }

        let path = self.entry_path(&key);
        let _guard = self.write_lock.lock().await;

        let previous = Self::existing_len(&path).await?;
        let old_size = previous.map(|len| key.len() as u64 + len).unwrap_or(0);
        let new_size = (key.len() + value.len()) as u64;

        let base = self
            .size_bytes
            .load(Ordering::Relaxed)
            .saturating_sub(old_size);
        if base + new_size > self.max_size_bytes {
            return Err(StoreError::QuotaExceeded {
                needed: new_size,
                available: self.max_size_bytes.saturating_sub(base),
            });
        }

        let temp_path = self.temp_path(&key);
        tokio::fs::write(&temp_path, value.as_bytes()).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StoreError::Io(e));
        }

        self.size_bytes.fetch_sub(old_size, Ordering::Relaxed);
        self.size_bytes.fetch_add(new_size, Ordering::Relaxed);
        if previous.is_none() {
            self.entry_count.fetch_add(1, Ordering::Relaxed);
        }

        debug!(key = %key, bytes = value.len(), "Disk store write");
        Ok(())
    }

    async fn delete_impl(&self, key: String) -> Result<bool, StoreError> {
        let path = self.entry_path(&key);
        let _guard = self.write_lock.lock().await;

        let Some(len) = Self::existing_len(&path).await? else {
            return Ok(false);
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                self.size_bytes
                    .fetch_sub(key.len() as u64 + len, Ordering::Relaxed);
                self.entry_count.fetch_sub(1, Ordering::Relaxed);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

impl KeyValueStore for DiskStoreProvider {
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(self.set_impl(key, value))
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StoreError::Io(e)),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let key = key.to_string();
        Box::pin(self.delete_impl(key))
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, StoreError>> {
        Box::pin(async move {
            let mut keys = Vec::new();
            let mut dir = tokio::fs::read_dir(&self.directory).await?;
            while let Some(entry) = dir.next_entry().await? {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                    continue;
                }
                if let Some(key) = key_from_path(&path) {
                    keys.push(key);
                }
            }
            Ok(keys)
        })
    }

    fn entry_count(&self) -> u64 {
        self.entry_count.load(Ordering::Relaxed)
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes.load(Ordering::Relaxed)
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}

fn key_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let bytes = hex::decode(stem).ok()?;
    String::from_utf8(bytes).ok()
}
