//! Cache management CLI commands.

use std::path::Path;
use std::sync::Arc;

use clap::Subcommand;
use tokio::runtime::Runtime;
use trackspeed::cache::{DiskStoreProvider, KeyValueStore, SpeedLimitCache};
use trackspeed::config::{format_size, ConfigFile};

use super::common::load_config;
use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show speed limit store statistics
    Stats,
    /// Remove expired and unreadable speed limit entries
    Prune,
    /// Remove all cached speed limits
    Clear,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let runtime = Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;

    runtime.block_on(run_action(action, &config))
}

async fn run_action(action: CacheAction, config: &ConfigFile) -> Result<(), CliError> {
    let cache_dir = &config.cache.directory;
    let store = DiskStoreProvider::open(cache_dir.clone(), config.cache.max_size).await?;
    let pipeline = config.to_pipeline_config();
    let cache = SpeedLimitCache::with_settings(
        store.clone(),
        pipeline.cache_prefix(),
        pipeline.cache_ttl(),
    );

    match action {
        CacheAction::Stats => {
            println!("Speed limit store: {}", cache_dir.display());
            println!("  Entries: {}", store.entry_count());
            println!(
                "  Size:    {} of {}",
                format_size(store.size_bytes()),
                format_size(store.max_size_bytes())
            );
            Ok(())
        }
        CacheAction::Prune => {
            println!("Pruning speed limit store at: {}", cache_dir.display());
            let result = cache.prune_expired().await;
            println!("{}", result);
            Ok(())
        }
        CacheAction::Clear => {
            println!("Clearing speed limit store at: {}", cache_dir.display());
            let removed = clear(&store, pipeline.cache_prefix()).await?;
            println!("Deleted {} entries", removed);
            Ok(())
        }
    }
}

/// Delete every key under `prefix`, leaving other keys in the store.
async fn clear(store: &Arc<DiskStoreProvider>, prefix: &str) -> Result<usize, CliError> {
    let mut removed = 0;
    for key in store.keys().await? {
        if key.starts_with(prefix) && store.delete(&key).await? {
            removed += 1;
        }
    }
    Ok(removed)
}
