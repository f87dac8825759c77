//! Speed limit provider adapter.
//!
//! This module translates batches of track points into requests against the
//! road-snapping service and parses the responses into per-index speed
//! limits normalized to km/h.
//!
//! # Example
//!
//! ```ignore
//! use trackspeed::provider::{AsyncReqwestClient, TomTomSnapProvider};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let provider = TomTomSnapProvider::new(http_client).with_cache(cache);
//! let resolution = provider.resolve_batch(&[0, 10, 20], &points, &api_key).await;
//! ```

mod http;
mod tomtom;
mod types;
mod units;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use tomtom::{TomTomSnapProvider, DEFAULT_ENDPOINT, DEFAULT_VEHICLE_TYPE, RESPONSE_FIELDS};
pub use types::{BatchResolution, ProviderError};
pub use units::{SpeedUnit, KM_PER_MILE};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
