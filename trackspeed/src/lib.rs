//! TrackSpeed - Speed limit enrichment for GPS tracks
//!
//! This library annotates every point of a recorded track with the legal
//! speed limit of the road it lies on, using a road-snapping provider and a
//! persistent coordinate-keyed cache.
//!
//! # High-Level API
//!
//! For most use cases, the [`app`] module wires everything together:
//!
//! ```ignore
//! use trackspeed::app::{AppConfig, TrackSpeedApp};
//!
//! let config = AppConfig::new(store_dir).with_api_key(api_key);
//! let app = TrackSpeedApp::start(config).await?;
//!
//! let (limits, report) = app.resolve(&points).await;
//! assert_eq!(limits.len(), points.len());
//! ```
//!
//! The individual stages ([`sampler`], [`batcher`], [`provider`],
//! [`interpolate`]) are public for callers that need finer control.

pub mod app;
pub mod batcher;
pub mod cache;
pub mod config;
pub mod geo;
pub mod interpolate;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod sampler;
pub mod track;

pub use pipeline::{ResolveReport, SpeedLimitPipeline};
pub use track::{SpeedLimitResult, TrackPoint};

/// Version of the TrackSpeed library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
