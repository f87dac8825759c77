//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP POST request with JSON body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `json_body` - JSON body as a string
    ///
    /// # Returns
    ///
    /// The response body as bytes, or an error for transport failures and
    /// non-success status codes.
    fn post_json(
        &self,
        url: &str,
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new client with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("trackspeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(json_body.to_string())
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(format!("POST request failed: {}", e)))?;

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            // Body usually carries the provider's error description
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), detail = %detail, "Provider returned error status");
            return Err(ProviderError::HttpStatus(status.as_u16()));
        }

        // Read response body
        match response.bytes().await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "Provider response received");
                Ok(bytes.to_vec())
            }
            Err(e) => Err(ProviderError::HttpError(format!(
                "Failed to read response: {}",
                e
            ))),
        }
    }
}
