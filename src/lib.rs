//! Guide-Scraper: a paginated guide-listing crawler and ranker
//!
//! This crate crawls a paginated listing of guides, discovers the detail pages
//! it links to, extracts one record per detail page, ranks the records by a
//! list of weighted sort keys and exports them as JSON, CSV or Markdown.

pub mod config;
pub mod crawler;
pub mod output;
pub mod ranking;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for Guide-Scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extractor setup failed: {0}")]
    Extract(#[from] crawler::ExtractError),

    #[error("Crawl task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Work queue is closed, cannot enqueue {url}")]
    QueueClosed { url: String },

    #[error("Dispatch loop stopped with {outstanding} work units outstanding")]
    DispatchStopped { outstanding: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown format '{0}'")]
    UnknownFormat(String),

    #[error("Unknown sorting field '{0}'")]
    UnknownSortField(String),

    #[error("Unknown sorting strategy '{0}'")]
    UnknownSortDirection(String),

    #[error("Failed to parse requested sorting '{0}'")]
    MalformedSortKey(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("{path} is not a valid output directory: {reason}")]
    OutputDirectory { path: String, reason: String },
}

/// Result type alias for Guide-Scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use ranking::{rank, SortDirection, SortKey};
pub use record::{Field, Record};
