//! Pipeline configuration.

use std::time::Duration;

use crate::batcher::DEFAULT_MAX_BATCH_KM;
use crate::cache::{DEFAULT_CACHE_TTL, DEFAULT_KEY_PREFIX};
use crate::provider::{DEFAULT_ENDPOINT, DEFAULT_VEHICLE_TYPE};
use crate::sampler::DEFAULT_SAMPLE_STRIDE;

/// Configuration for one speed limit pipeline.
///
/// # Example
///
/// ```
/// use trackspeed::config::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.sample_stride(), 10);
/// assert_eq!(config.max_batch_km(), 90.0);
///
/// let config = PipelineConfig::new()
///     .with_sample_stride(5)
///     .with_vehicle_type("Truck");
/// assert_eq!(config.vehicle_type(), "Truck");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Distance in indices between sampled points
    sample_stride: usize,
    /// Cumulative path length per provider request (km)
    max_batch_km: f64,
    /// Age after which cached limits are ignored
    cache_ttl: Duration,
    /// Namespace prefix for cache keys
    cache_prefix: String,
    /// Provider endpoint URL
    endpoint: String,
    /// Vehicle type hint sent to the provider
    vehicle_type: String,
}

impl PipelineConfig {
    /// Create a new pipeline configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling stride.
    pub fn with_sample_stride(mut self, stride: usize) -> Self {
        self.sample_stride = stride;
        self
    }

    /// Set the maximum cumulative distance per batch.
    pub fn with_max_batch_km(mut self, km: f64) -> Self {
        self.max_batch_km = km;
        self
    }

    /// Set the cache expiry window.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the cache key prefix.
    pub fn with_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_prefix = prefix.into();
        self
    }

    /// Set the provider endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the vehicle type hint.
    pub fn with_vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = vehicle_type.into();
        self
    }

    pub fn sample_stride(&self) -> usize {
        self.sample_stride
    }

    pub fn max_batch_km(&self) -> f64 {
        self.max_batch_km
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn cache_prefix(&self) -> &str {
        &self.cache_prefix
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            max_batch_km: DEFAULT_MAX_BATCH_KM,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_prefix: DEFAULT_KEY_PREFIX.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            vehicle_type: DEFAULT_VEHICLE_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.sample_stride(), 10);
        assert_eq!(config.max_batch_km(), 90.0);
        assert_eq!(config.cache_ttl(), Duration::from_secs(30 * 24 * 3600));
        assert_eq!(config.cache_prefix(), "speedlimit:");
        assert_eq!(config.vehicle_type(), "PassengerCar");
        assert!(config.endpoint().contains("snapToRoads"));
    }

    #[test]
    fn test_builder_chain() {
        let config = PipelineConfig::new()
            .with_sample_stride(3)
            .with_max_batch_km(40.0)
            .with_cache_ttl(Duration::from_secs(60))
            .with_cache_prefix("test:")
            .with_endpoint("http://localhost:8080/snap");

        assert_eq!(config.sample_stride(), 3);
        assert_eq!(config.max_batch_km(), 40.0);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.cache_prefix(), "test:");
        assert_eq!(config.endpoint(), "http://localhost:8080/snap");
    }
}
