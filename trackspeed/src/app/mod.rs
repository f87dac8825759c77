//! Application bootstrap and lifecycle management.
//!
//! `TrackSpeedApp` handles startup ordering:
//!
//! ```text
//! DiskStoreProvider::open ─► SpeedLimitCache::prune_expired ─► AsyncReqwestClient
//!                                                              └─► SpeedLimitPipeline
//! ```
//!
//! # Example
//!
//! ```ignore
//! use trackspeed::app::{AppConfig, TrackSpeedApp};
//!
//! let app = TrackSpeedApp::start(config).await?;
//! let (limits, report) = app.resolve(&points).await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::TrackSpeedApp;
pub use config::AppConfig;
pub use error::AppError;
