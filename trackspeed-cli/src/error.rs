//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use trackspeed::app::AppError;
use trackspeed::cache::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Missing provider credential
    MissingApiKey,
    /// Application startup failed
    App(AppError),
    /// Failed to create the async runtime
    Runtime(String),
    /// Store operation failed
    Store(StoreError),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Failed to write an output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Input file is not a valid track
    InvalidTrack { path: PathBuf, reason: String },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::MissingApiKey => {
                eprintln!();
                eprintln!("Provide a TomTom API key with --api-key, or set it in");
                eprintln!("the [provider] section of ~/.trackspeed/config.ini:");
                eprintln!();
                eprintln!("  [provider]");
                eprintln!("  api_key = <your key>");
            }
            CliError::InvalidTrack { .. } => {
                eprintln!();
                eprintln!("Expected a JSON array of points, for example:");
                eprintln!(
                    "  [{{\"latitude\": 52.52, \"longitude\": 13.405, \"timestamp\": \"2024-05-01T10:00:00Z\"}}]"
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::MissingApiKey => write!(f, "No provider API key configured"),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Runtime(msg) => write!(f, "Failed to create async runtime: {}", msg),
            CliError::Store(e) => write!(f, "Speed limit store error: {}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::InvalidTrack { path, reason } => {
                write!(f, "Invalid track file '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::App(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}
