//! Key-value store provider implementations.
//!
//! Each provider implements the `KeyValueStore` trait.
//!
//! # Available Providers
//!
//! - [`MemoryStoreProvider`]: In-memory store using dashmap
//! - [`DiskStoreProvider`]: One file per entry in a directory

mod disk;
mod memory;

pub use disk::{DiskStoreProvider, MAX_DISK_KEY_BYTES};
pub use memory::MemoryStoreProvider;
