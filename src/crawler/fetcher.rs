//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Throttling requests through [`OriginThrottle`]
//! - Error classification (status, network, content type)

use crate::config::{Config, UserAgentConfig};
use crate::crawler::scheduler::OriginThrottle;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Reasons a single fetch attempt failed
///
/// Every variant is recoverable: the crawler requeues the URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Expected an HTML document, got content type '{content_type}'")]
    ContentMismatch { content_type: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request throttle is closed")]
    ThrottleClosed,
}

/// Retrieves documents by URL
///
/// Implementations enforce their own concurrency and politeness limits; the
/// crawler calls `fetch` from many tasks at once.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Fetches `url` and returns the document body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use guide_scraper::config::UserAgentConfig;
/// use guide_scraper::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "guide-scraper".to_string(),
///     crawler_version: "0.1.0".to_string(),
///     contact_url: Some("https://example.com/about".to_string()),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`FetchClient`] backed by reqwest
pub struct HttpFetcher {
    client: Client,
    throttle: OriginThrottle,
}

impl HttpFetcher {
    /// Creates a fetcher from an existing client and throttle
    pub fn new(client: Client, throttle: OriginThrottle) -> Self {
        Self { client, throttle }
    }

    /// Creates a fetcher using the user agent, parallelism and delay settings
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_http_client(&config.user_agent)?,
            OriginThrottle::from_config(&config.crawler),
        ))
    }
}

#[async_trait]
impl FetchClient for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url)?;
        let _scheduled = self
            .throttle
            .acquire(&url)
            .await
            .map_err(|_| FetchError::ThrottleClosed)?;

        tracing::debug!("Visiting {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch { content_type });
        }

        Ok(response.text().await?)
    }
}
