//! Application bootstrap implementation.
//!
//! `TrackSpeedApp` opens the store, prunes expired entries once, then wires
//! the HTTP client, cache and pipeline together.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::{DiskStoreProvider, SpeedLimitCache};
use crate::pipeline::{ResolveReport, SpeedLimitPipeline};
use crate::provider::AsyncReqwestClient;
use crate::track::{SpeedLimitResult, TrackPoint};

/// TrackSpeed application with ordered startup.
///
/// # Example
///
/// ```ignore
/// use trackspeed::app::{AppConfig, TrackSpeedApp};
///
/// let config = AppConfig::new(store_dir).with_api_key(key);
/// let app = TrackSpeedApp::start(config).await?;
/// let (limits, report) = app.resolve(&points).await;
/// ```
pub struct TrackSpeedApp {
    store: Arc<DiskStoreProvider>,
    cache: Arc<SpeedLimitCache>,
    pipeline: SpeedLimitPipeline<AsyncReqwestClient>,
    config: AppConfig,

    /// Owned runtime when created via `start_sync()`.
    runtime: Option<Runtime>,
}

impl TrackSpeedApp {
    /// Start the application with the given configuration.
    ///
    /// This method:
    /// 1. Opens the disk store
    /// 2. Removes expired and unreadable entries
    /// 3. Builds the HTTP client and pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable, the store cannot
    /// be opened or the HTTP client cannot be built.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        if config.store_max_size == 0 {
            return Err(AppError::Config(
                "store size must be greater than zero".to_string(),
            ));
        }

        info!(
            directory = %config.store_directory.display(),
            max_size_bytes = config.store_max_size,
            "Starting TrackSpeedApp"
        );

        // 1. Store first; everything else reads from it
        let store =
            DiskStoreProvider::open(config.store_directory.clone(), config.store_max_size).await?;

        let cache = Arc::new(SpeedLimitCache::with_settings(
            store.clone(),
            config.pipeline.cache_prefix(),
            config.pipeline.cache_ttl(),
        ));

        // 2. Prune once at startup
        let pruned = cache.prune_expired().await;
        info!(
            scanned = pruned.entries_scanned,
            expired = pruned.expired_removed,
            corrupt = pruned.corrupt_removed,
            "Startup prune complete"
        );

        // 3. Client and pipeline
        let http_client = AsyncReqwestClient::with_timeout(config.timeout_secs)?;
        let pipeline =
            SpeedLimitPipeline::new(http_client, Arc::clone(&cache), config.pipeline.clone());

        if config.api_key.as_deref().map_or(true, str::is_empty) {
            warn!("No provider API key configured, resolution will return no limits");
        }

        Ok(Self {
            store,
            cache,
            pipeline,
            config,
            runtime: None,
        })
    }

    /// Start the application synchronously (creates its own runtime).
    ///
    /// Use [`block_on`](Self::block_on) to drive the pipeline afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created or startup fails.
    pub fn start_sync(config: AppConfig) -> Result<Self, AppError> {
        let runtime = Runtime::new().map_err(|e| AppError::RuntimeCreation(e.to_string()))?;

        let mut app = runtime.block_on(Self::start(config))?;
        app.runtime = Some(runtime);

        Ok(app)
    }

    /// Run a future on the runtime owned by this app.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RuntimeCreation` if the app was started with
    /// [`start`](Self::start) rather than [`start_sync`](Self::start_sync).
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, AppError> {
        match &self.runtime {
            Some(runtime) => Ok(runtime.block_on(future)),
            None => Err(AppError::RuntimeCreation(
                "application was started without an owned runtime".to_string(),
            )),
        }
    }

    /// Resolve limits for `points` with the configured credential.
    pub async fn resolve(&self, points: &[TrackPoint]) -> (SpeedLimitResult, ResolveReport) {
        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        self.pipeline.resolve_with_report(points, api_key).await
    }

    /// The speed limit pipeline.
    pub fn pipeline(&self) -> &SpeedLimitPipeline<AsyncReqwestClient> {
        &self.pipeline
    }

    /// The speed limit cache.
    pub fn cache(&self) -> &Arc<SpeedLimitCache> {
        &self.cache
    }

    /// The disk store backing the cache.
    pub fn store(&self) -> &Arc<DiskStoreProvider> {
        &self.store
    }

    /// The configuration the app was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
