//! Speed limit enrichment pipeline.
//!
//! Sequences the stages for one track:
//!
//! ```text
//! sample → cache lookup → batch misses by distance → provider (sequential) → fill gaps
//! ```
//!
//! Every failure degrades to missing values. The result always has one
//! entry per input point, except for an empty track or missing credential,
//! which yield an empty result.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::batcher::split_by_distance;
use crate::cache::SpeedLimitCache;
use crate::config::PipelineConfig;
use crate::interpolate::fill;
use crate::provider::{AsyncHttpClient, TomTomSnapProvider};
use crate::sampler::sample_with_stride;
use crate::track::{SpeedLimitResult, TrackPoint};

/// Statistics for one pipeline invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Number of input points.
    pub points: usize,
    /// Points selected for lookup.
    pub sampled: usize,
    /// Sampled points answered from the cache.
    pub cache_hits: usize,
    /// Provider requests issued.
    pub batches: usize,
    /// Provider requests that failed outright.
    pub failed_batches: usize,
    /// Sampled points resolved by the provider.
    pub resolved_from_provider: usize,
    /// Points still without a limit after gap filling.
    pub unresolved_after_fill: usize,
}

impl fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points, {} sampled ({} cached, {} from provider), {}/{} batches failed, {} unresolved",
            self.points,
            self.sampled,
            self.cache_hits,
            self.resolved_from_provider,
            self.failed_batches,
            self.batches,
            self.unresolved_after_fill
        )
    }
}

/// Speed limit pipeline over a provider and a cache.
///
/// # Example
///
/// ```ignore
/// let pipeline = SpeedLimitPipeline::new(http_client, cache, PipelineConfig::default());
/// let limits = pipeline.resolve_speed_limits(&points, &api_key).await;
/// assert_eq!(limits.len(), points.len());
/// ```
pub struct SpeedLimitPipeline<C: AsyncHttpClient> {
    provider: TomTomSnapProvider<C>,
    cache: Arc<SpeedLimitCache>,
    config: PipelineConfig,
}

impl<C: AsyncHttpClient> SpeedLimitPipeline<C> {
    /// Create a pipeline.
    ///
    /// The provider is configured from `config` and writes through to
    /// `cache`.
    pub fn new(http_client: C, cache: Arc<SpeedLimitCache>, config: PipelineConfig) -> Self {
        let provider = TomTomSnapProvider::new(http_client)
            .with_endpoint(config.endpoint())
            .with_vehicle_type(config.vehicle_type())
            .with_cache(Arc::clone(&cache));

        Self {
            provider,
            cache,
            config,
        }
    }

    /// The cache used by this pipeline.
    pub fn cache(&self) -> &Arc<SpeedLimitCache> {
        &self.cache
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve a speed limit (km/h) for every point of a track.
    ///
    /// Returns an empty result when `points` or `api_key` is empty.
    /// Otherwise returns exactly `points.len()` entries; `None` marks points
    /// whose limit could not be determined.
    pub async fn resolve_speed_limits(
        &self,
        points: &[TrackPoint],
        api_key: &str,
    ) -> SpeedLimitResult {
        self.resolve_with_report(points, api_key).await.0
    }

    /// Like [`resolve_speed_limits`](Self::resolve_speed_limits), also
    /// returning per-invocation statistics.
    #[instrument(skip_all, fields(points = points.len()))]
    pub async fn resolve_with_report(
        &self,
        points: &[TrackPoint],
        api_key: &str,
    ) -> (SpeedLimitResult, ResolveReport) {
        let mut report = ResolveReport {
            points: points.len(),
            ..Default::default()
        };

        if points.is_empty() || api_key.is_empty() {
            debug!("No points or no API key, skipping resolution");
            return (Vec::new(), report);
        }

        let mut results: SpeedLimitResult = vec![None; points.len()];

        let sampled = sample_with_stride(points, self.config.sample_stride());
        report.sampled = sampled.len();

        let mut misses = Vec::with_capacity(sampled.len());
        for &index in &sampled {
            let point = &points[index];
            match self.cache.lookup(point.latitude, point.longitude).await {
                Some(entry) => {
                    results[index] = Some(entry.limit_kmh);
                    report.cache_hits += 1;
                }
                None => misses.push(index),
            }
        }

        let batches = split_by_distance(&misses, points, self.config.max_batch_km());
        report.batches = batches.len();
        debug!(
            sampled = report.sampled,
            cache_hits = report.cache_hits,
            batches = report.batches,
            "Resolving cache misses"
        );

        for batch in &batches {
            let resolution = self.provider.resolve_batch(batch, points, api_key).await;
            if resolution.request_failed {
                report.failed_batches += 1;
            }
            for (index, limit) in resolution.resolved {
                results[index] = Some(limit);
                report.resolved_from_provider += 1;
            }
        }

        let results = fill(results);
        report.unresolved_after_fill = results.iter().filter(|r| r.is_none()).count();

        info!(
            points = report.points,
            sampled = report.sampled,
            cache_hits = report.cache_hits,
            batches = report.batches,
            failed_batches = report.failed_batches,
            unresolved = report.unresolved_after_fill,
            "Speed limits resolved"
        );

        (results, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{KeyValueStore, MemoryStoreProvider};
    use crate::provider::{MockAsyncHttpClient, ProviderError};
    use serde_json::json;

    fn snap_response(limit: u32, unit: &str, projected: usize) -> Vec<u8> {
        let projected: Vec<_> = (0..projected)
            .map(|_| json!({"properties": {"routeIndex": 0}}))
            .collect();
        json!({
            "route": [{"properties": {"speedLimits": {"value": limit, "unit": unit}}}],
            "projectedPoints": projected,
        })
        .to_string()
        .into_bytes()
    }

    fn pipeline_with(
        mock: MockAsyncHttpClient,
        max_store_bytes: u64,
    ) -> (SpeedLimitPipeline<MockAsyncHttpClient>, Arc<MemoryStoreProvider>) {
        let store = Arc::new(MemoryStoreProvider::new(max_store_bytes));
        let cache = Arc::new(SpeedLimitCache::new(store.clone()));
        (
            SpeedLimitPipeline::new(mock, cache, PipelineConfig::default()),
            store,
        )
    }

    fn line(n: usize) -> Vec<TrackPoint> {
        (0..n)
            .map(|i| TrackPoint::new(40.0 + i as f64 * 0.0005, -3.7))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_points_returns_empty() {
        let mock = MockAsyncHttpClient::always(Ok(snap_response(50, "kmph", 1)));
        let (pipeline, _) = pipeline_with(mock.clone(), 1_000_000);

        assert!(pipeline.resolve_speed_limits(&[], "key").await.is_empty());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_api_key_returns_empty() {
        let mock = MockAsyncHttpClient::always(Ok(snap_response(50, "kmph", 1)));
        let (pipeline, _) = pipeline_with(mock.clone(), 1_000_000);

        assert!(pipeline.resolve_speed_limits(&line(5), "").await.is_empty());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_all_points_filled_from_sampled_results() {
        let mock = MockAsyncHttpClient::always(Ok(snap_response(60, "MPH", 4)));
        let (pipeline, store) = pipeline_with(mock.clone(), 1_000_000);

        let (limits, report) = pipeline.resolve_with_report(&line(25), "key").await;

        assert_eq!(limits, vec![Some(97); 25]);
        assert_eq!(report.sampled, 4);
        assert_eq!(report.batches, 1);
        assert_eq!(report.resolved_from_provider, 4);
        assert_eq!(report.unresolved_after_fill, 0);
        assert_eq!(mock.requests().len(), 1);
        assert_eq!(store.entry_count(), 4);
    }

    #[tokio::test]
    async fn test_single_resolved_point_fills_identical_track() {
        // Only the first batch member is projected; the rest stay unresolved.
        let mock = MockAsyncHttpClient::always(Ok(snap_response(50, "KMPH", 1)));
        let (pipeline, _) = pipeline_with(mock, 1_000_000);
        let points = vec![TrackPoint::new(47.3769, 8.5417); 25];

        let (limits, report) = pipeline.resolve_with_report(&points, "key").await;

        assert_eq!(limits, vec![Some(50); 25]);
        assert_eq!(report.resolved_from_provider, 1);
    }

    #[tokio::test]
    async fn test_second_run_served_from_cache() {
        let mock = MockAsyncHttpClient::always(Ok(snap_response(50, "kmph", 4)));
        let (pipeline, _) = pipeline_with(mock.clone(), 1_000_000);
        let points = line(25);

        pipeline.resolve_speed_limits(&points, "key").await;
        let (limits, report) = pipeline.resolve_with_report(&points, "key").await;

        assert_eq!(limits, vec![Some(50); 25]);
        assert_eq!(report.cache_hits, 4);
        assert_eq!(report.batches, 0);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_yields_unresolved_same_length() {
        let mock = MockAsyncHttpClient::always(Err(ProviderError::HttpStatus(500)));
        let (pipeline, _) = pipeline_with(mock, 1_000_000);

        let (limits, report) = pipeline.resolve_with_report(&line(12), "key").await;

        assert_eq!(limits, vec![None; 12]);
        assert_eq!(report.failed_batches, 1);
        assert_eq!(report.unresolved_after_fill, 12);
    }

    #[tokio::test]
    async fn test_full_store_does_not_change_result() {
        let mock = MockAsyncHttpClient::always(Ok(snap_response(50, "kmph", 4)));
        let (pipeline, store) = pipeline_with(mock, 8);

        let limits = pipeline.resolve_speed_limits(&line(25), "key").await;

        assert_eq!(limits, vec![Some(50); 25]);
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn test_report_display() {
        let report = ResolveReport {
            points: 25,
            sampled: 4,
            cache_hits: 1,
            batches: 1,
            failed_batches: 0,
            resolved_from_provider: 3,
            unresolved_after_fill: 0,
        };
        let text = report.to_string();
        assert!(text.starts_with("25 points, 4 sampled"));
        assert!(text.contains("0/1 batches failed"));
    }
}
