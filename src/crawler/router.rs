//! Response handling for fetched pages
//!
//! Every fetched URL is routed by shape: guide pages yield a record, any
//! other page is a listing that yields guide links and a pagination bound.
//! A failed fetch or an unreadable guide page puts the URL back on the queue
//! as the same unit of work.

use crate::crawler::coordinator::CrawlContext;
use crate::crawler::fetcher::FetchError;
use crate::Result;
use scraper::Html;
use std::sync::atomic::Ordering;
use std::sync::PoisonError;

impl CrawlContext {
    /// Fetches `url` and handles the response
    pub(super) async fn visit(&self, url: String) -> Result<()> {
        let fetched = self.fetcher.fetch(&url).await;
        self.route(url, fetched)
    }

    fn route(&self, url: String, fetched: std::result::Result<String, FetchError>) -> Result<()> {
        let body = match fetched {
            Ok(body) => body,
            Err(e) => return self.requeue(url, &e.to_string()),
        };

        let document = Html::parse_document(&body);
        if self.extractor.is_detail_url(&url) {
            self.handle_detail(url, &document)
        } else {
            self.handle_listing(&url, &document)
        }
    }

    fn handle_listing(&self, url: &str, document: &Html) -> Result<()> {
        let links = self.extractor.extract_listing_links(document);
        tracing::debug!("Found {} guide links on {}", links.len(), url);
        for link in links {
            self.completion.increment(1);
            self.queue.push(link)?;
        }

        if let Some(candidate) = self.extractor.extract_max_page_index(document) {
            let unlocked = self.frontier.observe_max_page(candidate);
            if !unlocked.is_empty() {
                tracing::info!("Found new max page: {}", candidate);
                self.completion.increment(unlocked.len());
                for page in unlocked {
                    self.queue.push(self.extractor.listing_url(page))?;
                }
            }
        }

        self.counters.listing_pages.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Page {} done", url);
        self.completion.decrement(1);
        Ok(())
    }

    fn handle_detail(&self, url: String, document: &Html) -> Result<()> {
        let record = match self.extractor.extract_record(&url, document) {
            Ok(record) => record,
            Err(e) => return self.requeue(url, &e.to_string()),
        };

        if self.store.insert(record).is_some() {
            tracing::debug!("Replaced earlier record for {}", url);
        }

        self.counters.detail_pages.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Guide page {} done", url);
        self.completion.decrement(1);
        Ok(())
    }

    /// Puts a failed URL back on the queue, or abandons it once it has used
    /// up its retries
    fn requeue(&self, url: String, reason: &str) -> Result<()> {
        self.counters.failed_attempts.fetch_add(1, Ordering::Relaxed);

        let failures = {
            let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
            let count = failures.entry(url.clone()).or_insert(0);
            *count += 1;
            *count
        };

        match self.max_retries {
            Some(max_retries) if failures > max_retries => {
                tracing::error!(
                    "Giving up on {} after {} failed attempts: {}",
                    url,
                    failures,
                    reason
                );
                self.counters
                    .abandoned
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(url);
                self.completion.decrement(1);
                Ok(())
            }
            _ => {
                tracing::warn!("Failed on {}, requeueing: {}", url, reason);
                self.queue.push(url)
            }
        }
    }
}
