//! Configuration types for TrackSpeed components.
//!
//! - [`PipelineConfig`]: tuning for one pipeline instance
//! - [`ConfigFile`]: user settings loaded from `~/.trackspeed/config.ini`
//!
//! # Example
//!
//! ```
//! use trackspeed::config::{ConfigFile, PipelineConfig};
//!
//! let file = ConfigFile::default();
//! let pipeline: PipelineConfig = file.to_pipeline_config();
//! assert_eq!(pipeline.sample_stride(), 10);
//! ```

mod file;
mod pipeline;
mod size;

pub use file::{
    config_directory, config_file_path, default_cache_directory, CacheSettings, ConfigFile,
    ConfigFileError, PipelineSettings, ProviderSettings, DEFAULT_CACHE_SIZE,
};
pub use pipeline::PipelineConfig;
pub use size::{format_size, parse_size, SizeParseError};
