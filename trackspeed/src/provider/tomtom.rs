//! TomTom Snap to Roads speed limit provider.
//!
//! Snaps a batch of track points onto the road network and reads the
//! maximum speed of the road segment each point was matched to.
//!
//! # API Endpoint
//!
//! `POST https://api.tomtom.com/snapToRoads/1?key={API_KEY}&vehicleType={TYPE}&fields={FIELDS}`
//!
//! The body is a GeoJSON-like point list in track order:
//!
//! ```text
//! {"points":[{"type":"Feature","geometry":{"type":"Point","coordinates":[lng,lat]}}, ...]}
//! ```
//!
//! # Response Shape
//!
//! - `route[]`: road segments, each optionally carrying
//!   `properties.speedLimits {value, unit}`
//! - `projectedPoints[]`: one entry per request point, in request order,
//!   with `properties.routeIndex` referencing a `route[]` segment
//!
//! The provider limits the total path length of a request to 100 km, which
//! is why requests are built from distance-bounded batches.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::cache::SpeedLimitCache;
use crate::provider::units::SpeedUnit;
use crate::provider::{AsyncHttpClient, BatchResolution, ProviderError};
use crate::track::TrackPoint;

/// Snap to Roads endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.tomtom.com/snapToRoads/1";

/// Vehicle type hint sent with every request.
pub const DEFAULT_VEHICLE_TYPE: &str = "PassengerCar";

/// Fields requested from the provider.
pub const RESPONSE_FIELDS: &str = "{projectedPoints{type,geometry{type,coordinates},properties{routeIndex}},route{type,geometry{type,coordinates},properties{id,speedLimits{value,unit,type}}}}";

/// Top-level response shape.
///
/// Features are kept as raw JSON so a malformed segment or projected point
/// only affects the points that reference it.
#[derive(Debug, Deserialize)]
struct SnapResponse {
    #[serde(default)]
    route: Vec<Value>,
    #[serde(default, rename = "projectedPoints")]
    projected_points: Vec<Value>,
}

/// Speed limit of a route segment in km/h.
fn segment_limit_kmh(segment: &Value) -> Option<u32> {
    let limit = segment.pointer("/properties/speedLimits")?;
    let value = limit.get("value")?.as_f64()?;
    let unit = limit.get("unit").and_then(Value::as_str).unwrap_or("kmph");
    SpeedUnit::parse(unit).to_kmh(value)
}

/// Route segment index referenced by a projected point.
fn projected_route_index(point: &Value) -> Option<usize> {
    let index = point.pointer("/properties/routeIndex")?.as_u64()?;
    usize::try_from(index).ok()
}

/// TomTom Snap to Roads speed limit provider.
///
/// # Example
///
/// ```no_run
/// use trackspeed::provider::{AsyncReqwestClient, TomTomSnapProvider};
///
/// let client = AsyncReqwestClient::new().unwrap();
/// let provider = TomTomSnapProvider::new(client);
/// // Use provider with SpeedLimitPipeline...
/// ```
pub struct TomTomSnapProvider<C: AsyncHttpClient> {
    http_client: C,
    endpoint: String,
    vehicle_type: String,
    cache: Option<Arc<SpeedLimitCache>>,
}

impl<C: AsyncHttpClient> TomTomSnapProvider<C> {
    /// Creates a provider using the public endpoint and passenger car hint.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            vehicle_type: DEFAULT_VEHICLE_TYPE.to_string(),
            cache: None,
        }
    }

    /// Use a different endpoint (e.g. a regional or proxy URL).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a different vehicle type hint.
    pub fn with_vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = vehicle_type.into();
        self
    }

    /// Write every resolved limit through to `cache`.
    pub fn with_cache(mut self, cache: Arc<SpeedLimitCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds the request URL carrying credential, vehicle hint and fields.
    fn build_url(&self, api_key: &str) -> String {
        format!(
            "{}?key={}&vehicleType={}&fields={}",
            self.endpoint,
            urlencoding::encode(api_key),
            urlencoding::encode(&self.vehicle_type),
            urlencoding::encode(RESPONSE_FIELDS)
        )
    }

    /// Builds the request body with the batch's points in batch order.
    fn build_body(batch: &[usize], points: &[TrackPoint]) -> String {
        let features: Vec<serde_json::Value> = batch
            .iter()
            .map(|&i| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [points[i].longitude, points[i].latitude],
                    },
                })
            })
            .collect();

        json!({ "points": features }).to_string()
    }

    /// Parses a response body into limits keyed by track index.
    ///
    /// The j-th projected point belongs to `batch[j]`. Points whose segment
    /// is missing or carries no usable limit are reported as unresolved.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidResponse` if the body is not valid JSON
    /// of the expected shape.
    pub fn parse_response(body: &[u8], batch: &[usize]) -> Result<BatchResolution, ProviderError> {
        let response: SnapResponse = serde_json::from_slice(body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if response.projected_points.len() != batch.len() {
            debug!(
                expected = batch.len(),
                received = response.projected_points.len(),
                "Projected point count differs from batch size"
            );
        }

        let mut resolution = BatchResolution::default();

        for (position, &index) in batch.iter().enumerate() {
            let limit = response
                .projected_points
                .get(position)
                .and_then(projected_route_index)
                .and_then(|route_index| response.route.get(route_index))
                .and_then(segment_limit_kmh);

            match limit {
                Some(kmh) => {
                    resolution.resolved.insert(index, kmh);
                }
                None => resolution.unresolved.push(index),
            }
        }

        Ok(resolution)
    }

    /// Resolve speed limits for one batch of track indices.
    ///
    /// Issues a single request. Transport failures, error statuses and
    /// malformed responses are logged and the whole batch is returned as
    /// unresolved; this never fails. Resolved limits are written through
    /// to the cache when one is configured.
    ///
    /// # Arguments
    ///
    /// * `batch` - Track indices to resolve, in track order
    /// * `points` - The full track
    /// * `api_key` - Provider credential
    pub async fn resolve_batch(
        &self,
        batch: &[usize],
        points: &[TrackPoint],
        api_key: &str,
    ) -> BatchResolution {
        if batch.is_empty() {
            return BatchResolution::default();
        }

        let url = self.build_url(api_key);
        let body = Self::build_body(batch, points);

        let response = match self.http_client.post_json(&url, &body).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    endpoint = %self.endpoint,
                    first_index = batch[0],
                    batch_len = batch.len(),
                    error = %e,
                    "Speed limit request failed, skipping batch"
                );
                return BatchResolution::failed(batch);
            }
        };

        let resolution = match Self::parse_response(&response, batch) {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(
                    endpoint = %self.endpoint,
                    first_index = batch[0],
                    batch_len = batch.len(),
                    error = %e,
                    "Failed to parse speed limit response, skipping batch"
                );
                return BatchResolution::failed(batch);
            }
        };

        debug!(
            batch_len = batch.len(),
            resolved = resolution.resolved.len(),
            unresolved = resolution.unresolved.len(),
            "Batch resolved"
        );

        if let Some(cache) = &self.cache {
            for (&index, &limit) in &resolution.resolved {
                let point = &points[index];
                cache
                    .store_limit(point.latitude, point.longitude, limit)
                    .await;
            }
        }

        resolution
    }
}
