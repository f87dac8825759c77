//! Application configuration for TrackSpeedApp.
//!
//! `AppConfig` combines everything needed to bootstrap the application:
//! where the store lives, how large it may grow, the provider credential
//! and the pipeline tuning.

use std::path::PathBuf;

use crate::config::{default_cache_directory, ConfigFile, PipelineConfig, DEFAULT_CACHE_SIZE};
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Application configuration combining all component configs.
///
/// This is the top-level configuration passed to `TrackSpeedApp::start()`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Directory of the persistent speed limit store.
    pub store_directory: PathBuf,

    /// Maximum store size in bytes.
    pub store_max_size: u64,

    /// Provider credential. Resolution yields nothing without one.
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Pipeline tuning.
    pub pipeline: PipelineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(default_cache_directory())
    }
}

impl AppConfig {
    /// Create a config with default sizes, storing entries under `store_directory`.
    pub fn new(store_directory: PathBuf) -> Self {
        Self {
            store_directory,
            store_max_size: DEFAULT_CACHE_SIZE,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pipeline: PipelineConfig::default(),
        }
    }

    /// Create application config from the configuration file.
    ///
    /// `api_key` overrides the key stored in the file when present.
    pub fn from_config_file(config: &ConfigFile, api_key: Option<String>) -> Self {
        Self {
            store_directory: config.cache.directory.clone(),
            store_max_size: config.cache.max_size,
            api_key: api_key.or_else(|| config.provider.api_key.clone()),
            timeout_secs: config.provider.timeout,
            pipeline: config.to_pipeline_config(),
        }
    }

    /// Set the provider credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the maximum store size.
    pub fn with_store_max_size(mut self, size_bytes: u64) -> Self {
        self.store_max_size = size_bytes;
        self
    }

    /// Set the pipeline tuning.
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }
}
