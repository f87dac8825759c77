//! Application error types.

use std::fmt;

use crate::cache::StoreError;
use crate::provider::ProviderError;

/// Errors that can occur while bootstrapping the application.
#[derive(Debug)]
pub enum AppError {
    /// Failed to open the persistent store.
    StoreOpen(StoreError),

    /// Failed to build the HTTP client.
    HttpClient(ProviderError),

    /// Configuration error.
    Config(String),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StoreOpen(e) => {
                write!(f, "Failed to open speed limit store: {}", e)
            }
            AppError::HttpClient(e) => {
                write!(f, "Failed to create HTTP client: {}", e)
            }
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            AppError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::StoreOpen(e) => Some(e),
            AppError::HttpClient(e) => Some(e),
            AppError::Config(_) => None,
            AppError::RuntimeCreation(_) => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreOpen(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::HttpClient(e)
    }
}
