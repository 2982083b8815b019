//! HTTP client shared by every provider backend

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use importmap_core::error::ImportmapError;
use crate::RegistryResult;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pooled HTTP client for registry and CDN requests.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the default timeout
    pub fn new() -> RegistryResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("importmap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ImportmapError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self { client })
    }

    /// Send a GET request and require a success status.
    ///
    /// The body is left unread so callers can stream it.
    pub async fn get(&self, url: &str) -> RegistryResult<Response> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImportmapError::network(format!("Failed to fetch {}: {}", url, e), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportmapError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Fetch `url` and decode the body as JSON of a known shape
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> RegistryResult<T> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| ImportmapError::network(format!("Failed to read {}: {}", url, e), e))?;

        serde_json::from_slice(&bytes).map_err(|e| ImportmapError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch `url` and return the body as text
    pub async fn get_text(&self, url: &str) -> RegistryResult<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| ImportmapError::network(format!("Failed to read {}: {}", url, e), e))
    }
}

/// Encode package name for registry URLs (handle scoped packages)
pub fn encode_package_name(name: &str) -> String {
    if name.starts_with('@') {
        // Scoped package: @org/pkg → @org%2fpkg
        name.replace('/', "%2f")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests;
