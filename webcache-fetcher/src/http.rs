//! HTTP page fetcher.
//!
//! One GET per call against a pooled `reqwest` client. No retries, no
//! header or auth plumbing; timeouts surface as cancelled fetches.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use webcache_core::constants::DEFAULT_HTTP_TIMEOUT_SECONDS;
use webcache_core::error::{Result, WebCacheError};
use webcache_core::traits::PageFetcher;

/// HTTP fetcher configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds. A request that exceeds it fails as a
    /// cancelled fetch.
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }
}

/// Fetches page content over HTTP.
///
/// The client is cheap to clone and reuses its connection pool across
/// calls. Non-success status codes are errors: a 404 page body is not
/// content worth caching.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HttpConfig::default())
    }

    /// Creates a fetcher with custom configuration.
    pub fn with_config(config: HttpConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches `url` with a single GET request and returns the raw body.
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed =
            Url::parse(url).map_err(|e| WebCacheError::InvalidUrl(format!("'{}': {}", url, e)))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| WebCacheError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
                cancelled: e.is_timeout(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Fetch returned non-success status");
            return Err(WebCacheError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| WebCacheError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
            cancelled: e.is_timeout(),
        })?;

        debug!(url, bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }
}
