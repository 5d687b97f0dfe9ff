//! Feed retrieval over HTTP
//!
//! [`FeedFetcher`] is the seam between the loader and the network. The production
//! implementation is [`HttpFeedFetcher`]; tests substitute their own.

use crate::config::FeedConfig;
use crate::error::{Error, FetchError, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Retrieves raw feed bytes
///
/// One call performs at most one outbound request and never retries. Callers are
/// expected to have checked connectivity first.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the body at `url`
    ///
    /// # Errors
    /// Returns a [`FetchError`] describing why no body was obtained
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// [`FeedFetcher`] backed by a shared `reqwest::Client`
#[derive(Clone, Debug)]
pub struct HttpFeedFetcher {
    http_client: reqwest::Client,
}

impl HttpFeedFetcher {
    /// Create a fetcher using the timeout and user agent from `config`
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Wrap an existing client
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| FetchError::TransportError(format!("invalid URL '{}': {}", url, e)))?;

        debug!(url = %parsed, "Fetching feed");

        let response = self
            .http_client
            .get(parsed)
            .send()
            .await
            .map_err(classify_error)?;

        // Check HTTP status before reading the body
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Feed returned non-success status");
            return Err(FetchError::NonSuccessStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(classify_error)?;
        debug!(url, bytes = body.len(), "Fetched feed body");

        Ok(body.to_vec())
    }
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::NetworkUnreachable(e.to_string())
    } else {
        FetchError::TransportError(e.to_string())
    }
}
