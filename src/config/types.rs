use crate::output::ExportFormat;
use crate::ranking::{parse_sort_keys, SortKey};
use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Guide-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Site root that listing and guide links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Listing path; the page index is appended to it
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Listing pages `1..=seed-page` are scheduled before any is fetched
    #[serde(rename = "seed-page")]
    pub seed_page: u32,

    /// Maximum number of concurrent page fetches
    pub parallelism: u32,

    /// Minimum time between requests to the same origin (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Failed attempts allowed per URL before it is abandoned; unset retries forever
    #[serde(rename = "max-retries")]
    pub max_retries: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://psnprofiles.com".to_string(),
            listing_path: "/guides/popular?page=".to_string(),
            seed_page: 1,
            parallelism: 6,
            request_delay_ms: 4000,
            max_retries: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Existing directory the export files are written to
    pub directory: String,

    /// Requested export formats (`json`, `csv`, `md`)
    pub formats: Vec<String>,

    /// Sort keys in priority order, each `field[;asc|desc]`
    pub sort: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            formats: vec!["json".to_string()],
            sort: Vec::new(),
        }
    }
}

impl OutputConfig {
    /// Parses the requested formats, dropping duplicates
    pub fn export_formats(&self) -> Result<Vec<ExportFormat>, ConfigError> {
        let mut formats = Vec::new();
        for raw in &self.formats {
            let format: ExportFormat = raw.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }

    /// Parses the requested sort keys in priority order
    pub fn sort_keys(&self) -> Result<Vec<SortKey>, ConfigError> {
        parse_sort_keys(&self.sort)
    }

    /// Returns the export directory as a path
    pub fn directory_path(&self) -> PathBuf {
        if self.directory.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&self.directory)
        }
    }
}
