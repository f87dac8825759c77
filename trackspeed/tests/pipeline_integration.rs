//! Integration tests for the speed limit pipeline.
//!
//! These tests drive the complete flow through the public API:
//! - sampling → cache → distance batching → provider → gap filling
//! - write-through caching on a persistent disk store
//! - degradation when requests fail
//!
//! Run with: `cargo test --test pipeline_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use trackspeed::cache::{DiskStoreProvider, KeyValueStore, MemoryStoreProvider, SpeedLimitCache};
use trackspeed::config::PipelineConfig;
use trackspeed::provider::{AsyncHttpClient, ProviderError};
use trackspeed::{SpeedLimitPipeline, TrackPoint};

// ============================================================================
// Helper Functions
// ============================================================================

/// HTTP client that answers snap requests with one road segment.
///
/// The first `fail_first` calls fail with a 503. Later calls return one
/// projected point per requested point, all on the same segment.
#[derive(Clone)]
struct ScriptedSnapClient {
    limit: u32,
    unit: &'static str,
    fail_first: usize,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSnapClient {
    fn new(limit: u32, unit: &'static str) -> Self {
        Self {
            limit,
            unit,
            fail_first: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing_first(mut self, count: usize) -> Self {
        self.fail_first = count;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for ScriptedSnapClient {
    async fn post_json(&self, _url: &str, json_body: &str) -> Result<Vec<u8>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            return Err(ProviderError::HttpStatus(503));
        }

        let request: Value = serde_json::from_str(json_body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let count = request["points"].as_array().map_or(0, Vec::len);

        let projected: Vec<Value> = (0..count)
            .map(|_| json!({"type": "Feature", "properties": {"routeIndex": 0}}))
            .collect();

        Ok(json!({
            "route": [{
                "type": "Feature",
                "properties": {"speedLimits": {"value": self.limit, "unit": self.unit}},
            }],
            "projectedPoints": projected,
        })
        .to_string()
        .into_bytes())
    }
}

/// Track along a meridian starting in Munich.
fn meridian_track(n: usize, step_deg: f64) -> Vec<TrackPoint> {
    (0..n)
        .map(|i| TrackPoint::new(48.0 + i as f64 * step_deg, 11.5))
        .collect()
}

fn memory_pipeline(
    client: ScriptedSnapClient,
) -> (SpeedLimitPipeline<ScriptedSnapClient>, Arc<MemoryStoreProvider>) {
    let store = Arc::new(MemoryStoreProvider::new(10 * 1024 * 1024));
    let cache = Arc::new(SpeedLimitCache::new(store.clone()));
    (
        SpeedLimitPipeline::new(client, cache, PipelineConfig::default()),
        store,
    )
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Twenty-five identical points all receive the single resolved limit.
#[tokio::test]
async fn test_stationary_track_fully_resolved() {
    let client = ScriptedSnapClient::new(50, "KMPH");
    let (pipeline, _) = memory_pipeline(client.clone());
    let points = vec![TrackPoint::new(52.520008, 13.404954); 25];

    let limits = pipeline.resolve_speed_limits(&points, "test-key").await;

    assert_eq!(limits, vec![Some(50); 25]);
    assert_eq!(client.calls(), 1);
}

/// Miles per hour are converted and rounded to whole km/h.
#[tokio::test]
async fn test_mph_limits_converted() {
    let client = ScriptedSnapClient::new(30, "MPH");
    let (pipeline, _) = memory_pipeline(client);

    let limits = pipeline
        .resolve_speed_limits(&meridian_track(12, 0.001), "test-key")
        .await;

    assert_eq!(limits, vec![Some(48); 12]);
}

/// A failed batch leaves its points to be filled from neighbouring batches.
#[tokio::test]
async fn test_failed_batch_filled_from_neighbours() {
    // ~1.1 km between points, ~222 km in total: several batches.
    let points = meridian_track(201, 0.01);
    let client = ScriptedSnapClient::new(80, "kmph").failing_first(1);
    let (pipeline, _) = memory_pipeline(client.clone());

    let (limits, report) = pipeline.resolve_with_report(&points, "test-key").await;

    assert!(report.batches >= 2, "expected several batches: {}", report);
    assert_eq!(report.failed_batches, 1);
    assert_eq!(client.calls(), report.batches);
    assert_eq!(limits.len(), points.len());
    assert!(limits.iter().all(|l| *l == Some(80)));
}

/// Every request failing yields one `None` per point, never an error.
#[tokio::test]
async fn test_all_batches_failing_yields_unresolved() {
    let points = meridian_track(201, 0.01);
    let client = ScriptedSnapClient::new(80, "kmph").failing_first(usize::MAX);
    let (pipeline, store) = memory_pipeline(client);

    let (limits, report) = pipeline.resolve_with_report(&points, "test-key").await;

    assert_eq!(limits, vec![None; 201]);
    assert_eq!(report.failed_batches, report.batches);
    assert_eq!(store.entry_count(), 0);
}

/// Points without a GPS fix are not queried but still receive a value.
#[tokio::test]
async fn test_points_without_fix_are_filled() {
    let mut points = meridian_track(21, 0.001);
    points[10] = TrackPoint::new(0.0, 0.0);
    points[15] = TrackPoint::new(f64::NAN, 11.5);

    let client = ScriptedSnapClient::new(70, "kmph");
    let (pipeline, _) = memory_pipeline(client);

    let (limits, report) = pipeline.resolve_with_report(&points, "test-key").await;

    assert_eq!(report.sampled, 2);
    assert_eq!(limits, vec![Some(70); 21]);
}

/// Resolved limits persist on disk and serve later runs without requests.
#[tokio::test]
async fn test_disk_cache_serves_later_runs() {
    let temp = TempDir::new().unwrap();
    let points = meridian_track(25, 0.001);

    {
        let store = DiskStoreProvider::open(temp.path(), 1024 * 1024).await.unwrap();
        let cache = Arc::new(SpeedLimitCache::new(store.clone()));
        let pipeline = SpeedLimitPipeline::new(
            ScriptedSnapClient::new(100, "kmph"),
            cache,
            PipelineConfig::default(),
        );

        pipeline.resolve_speed_limits(&points, "test-key").await;
        assert_eq!(store.entry_count(), 4);
    }

    let store = DiskStoreProvider::open(temp.path(), 1024 * 1024).await.unwrap();
    assert_eq!(store.entry_count(), 4);

    let offline = ScriptedSnapClient::new(0, "kmph").failing_first(usize::MAX);
    let cache = Arc::new(SpeedLimitCache::new(store));
    let pipeline = SpeedLimitPipeline::new(offline.clone(), cache, PipelineConfig::default());

    let (limits, report) = pipeline.resolve_with_report(&points, "test-key").await;

    assert_eq!(limits, vec![Some(100); 25]);
    assert_eq!(report.cache_hits, 4);
    assert_eq!(offline.calls(), 0);
}

/// Empty input and missing credentials short-circuit before any request.
#[tokio::test]
async fn test_empty_inputs_issue_no_requests() {
    let client = ScriptedSnapClient::new(50, "kmph");
    let (pipeline, _) = memory_pipeline(client.clone());

    assert!(pipeline.resolve_speed_limits(&[], "test-key").await.is_empty());
    assert!(pipeline
        .resolve_speed_limits(&meridian_track(5, 0.001), "")
        .await
        .is_empty());
    assert_eq!(client.calls(), 0);
}
