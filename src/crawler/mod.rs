//! Crawler module for guide page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-origin request spacing
//! - Listing and guide page extraction
//! - The work queue and dispatch loop
//! - Routing responses into the frontier, completion tracker and record store

mod coordinator;
mod fetcher;
mod parser;
mod queue;
mod router;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, FetchClient, FetchError, HttpFetcher};
pub use parser::{ExtractError, Extractor, GuideExtractor};
pub use queue::WorkQueue;
pub use scheduler::{OriginThrottle, ScheduledRequest};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for the crawl phase. It will:
/// 1. Build the HTTP client and guide extractor
/// 2. Seed the work queue with the first listing pages
/// 3. Fetch pages, following pagination and guide links
/// 4. Return once every scheduled page has been resolved
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl drained; records are ordered by link
/// * `Err(ScraperError)` - Crawl failed
pub async fn crawl(config: &Config) -> Result<CrawlOutcome> {
    run_crawl(config).await
}
