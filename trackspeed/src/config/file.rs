//! Configuration file handling for ~/.trackspeed/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//!
//! ```ini
//! [provider]
//! api_key = YOUR_TOMTOM_KEY
//! vehicle_type = PassengerCar
//! timeout = 30
//!
//! [cache]
//! directory = ~/.trackspeed/cache
//! max_size = 10MB
//!
//! [pipeline]
//! sample_stride = 10
//! max_batch_km = 90
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::pipeline::PipelineConfig;
use super::size::{format_size, parse_size};
use crate::batcher::DEFAULT_MAX_BATCH_KM;
use crate::provider::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_VEHICLE_TYPE};
use crate::sampler::DEFAULT_SAMPLE_STRIDE;

/// Default disk cache size (10 MB, in line with browser storage quotas).
pub const DEFAULT_CACHE_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Provider configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Provider API key
    pub api_key: Option<String>,
    /// Vehicle type hint
    pub vehicle_type: String,
    /// Endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Cache directory path
    pub directory: PathBuf,
    /// Maximum cache size in bytes
    pub max_size: u64,
}

/// Pipeline tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub sample_stride: usize,
    pub max_batch_km: f64,
}

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Provider settings
    pub provider: ProviderSettings,
    /// Cache settings
    pub cache: CacheSettings,
    /// Pipeline settings
    pub pipeline: PipelineSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                api_key: None,
                vehicle_type: DEFAULT_VEHICLE_TYPE.to_string(),
                endpoint: DEFAULT_ENDPOINT.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            cache: CacheSettings {
                directory: default_cache_directory(),
                max_size: DEFAULT_CACHE_SIZE,
            },
            pipeline: PipelineSettings {
                sample_stride: DEFAULT_SAMPLE_STRIDE,
                max_batch_km: DEFAULT_MAX_BATCH_KM,
            },
        }
    }
}

impl ConfigFile {
    /// Load configuration from the default path (~/.trackspeed/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("provider"))
            .set("api_key", self.provider.api_key.clone().unwrap_or_default())
            .set("vehicle_type", self.provider.vehicle_type.as_str())
            .set("endpoint", self.provider.endpoint.as_str())
            .set("timeout", self.provider.timeout.to_string());
        ini.with_section(Some("cache"))
            .set("directory", self.cache.directory.display().to_string())
            .set("max_size", format_size(self.cache.max_size));
        ini.with_section(Some("pipeline"))
            .set("sample_stride", self.pipeline.sample_stride.to_string())
            .set("max_batch_km", self.pipeline.max_batch_km.to_string());

        ini.write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Pipeline configuration derived from these settings.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_sample_stride(self.pipeline.sample_stride)
            .with_max_batch_km(self.pipeline.max_batch_km)
            .with_endpoint(self.provider.endpoint.as_str())
            .with_vehicle_type(self.provider.vehicle_type.as_str())
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.provider.api_key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("vehicle_type") {
            let v = v.trim();
            if !v.is_empty() {
                config.provider.vehicle_type = v.to_string();
            }
        }
        if let Some(v) = section.get("endpoint") {
            let v = v.trim();
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid("provider", "endpoint", v, "must be an http(s) URL"));
            }
            config.provider.endpoint = v.to_string();
        }
        if let Some(v) = section.get("timeout") {
            config.provider.timeout = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|t| *t > 0)
                .ok_or_else(|| {
                    invalid("provider", "timeout", v, "must be a positive integer (seconds)")
                })?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("max_size") {
            config.cache.max_size = parse_size(v).map_err(|_| {
                invalid(
                    "cache",
                    "max_size",
                    v,
                    "expected format like '10MB', '512KB', or '1048576'",
                )
            })?;
        }
    }

    // [pipeline] section
    if let Some(section) = ini.section(Some("pipeline")) {
        if let Some(v) = section.get("sample_stride") {
            config.pipeline.sample_stride = v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    invalid("pipeline", "sample_stride", v, "must be a positive integer")
                })?;
        }
        if let Some(v) = section.get("max_batch_km") {
            config.pipeline.max_batch_km = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|km| km.is_finite() && *km > 0.0 && *km <= 100.0)
                .ok_or_else(|| {
                    invalid(
                        "pipeline",
                        "max_batch_km",
                        v,
                        "must be a number greater than 0 and at most 100",
                    )
                })?;
        }
    }

    Ok(config)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Get the path to the config directory (~/.trackspeed).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trackspeed")
}

/// Get the path to the config file (~/.trackspeed/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Default cache directory (platform cache dir, e.g. ~/.cache/trackspeed).
pub fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("trackspeed"))
        .unwrap_or_else(|| config_directory().join("cache"))
}
