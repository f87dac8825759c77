//! Provider types

use std::collections::BTreeMap;
use std::fmt;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed before a response was received
    HttpError(String),
    /// Provider answered with a non-success status code
    HttpStatus(u16),
    /// Invalid response data from provider
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::HttpStatus(status) => write!(f, "HTTP status {}", status),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Speed limits resolved for one request batch.
///
/// Indices refer to the full input track, not to positions in the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResolution {
    /// Limits in km/h by track index.
    pub resolved: BTreeMap<usize, u32>,
    /// Track indices in the batch without a limit.
    pub unresolved: Vec<usize>,
    /// Whether the request itself failed (transport, status or parse).
    pub request_failed: bool,
}

impl BatchResolution {
    /// A resolution for a batch whose request failed outright.
    pub fn failed(batch: &[usize]) -> Self {
        Self {
            resolved: BTreeMap::new(),
            unresolved: batch.to_vec(),
            request_failed: true,
        }
    }
}
