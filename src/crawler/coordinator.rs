//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the dispatch loop and the crawl lifecycle:
//! - Seeding the work queue with the first listing pages
//! - Dispatching every queued URL as its own fetch task
//! - Waiting for the outstanding work count to drain to zero
//! - Closing the queue and handing the collected records back

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{FetchClient, HttpFetcher};
use crate::crawler::parser::{Extractor, GuideExtractor};
use crate::crawler::queue::WorkQueue;
use crate::record::Record;
use crate::state::{CompletionTracker, FrontierTracker, RecordStore};
use crate::{Result, ScraperError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;

/// What a finished crawl produced
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Collected records, ordered by link
    pub records: Vec<Record>,

    /// Highest listing page index discovered
    pub max_page: u32,

    /// Listing pages successfully processed
    pub listing_pages: usize,

    /// Detail pages successfully processed
    pub detail_pages: usize,

    /// Failed fetch or parse attempts that were requeued or abandoned
    pub failed_attempts: usize,

    /// URLs given up on after exhausting their retries
    pub abandoned: Vec<String>,
}

/// Progress counters updated by the response handlers
#[derive(Default)]
pub(super) struct CrawlCounters {
    pub(super) listing_pages: AtomicUsize,
    pub(super) detail_pages: AtomicUsize,
    pub(super) failed_attempts: AtomicUsize,
    pub(super) abandoned: Mutex<Vec<String>>,
}

/// State shared by every fetch task of one crawl run
pub(super) struct CrawlContext {
    pub(super) fetcher: Arc<dyn FetchClient>,
    pub(super) extractor: Arc<dyn Extractor>,
    pub(super) frontier: FrontierTracker,
    pub(super) completion: CompletionTracker,
    pub(super) store: RecordStore,
    pub(super) queue: WorkQueue,

    /// Failed attempts allowed per URL; `None` retries forever
    pub(super) max_retries: Option<u32>,

    /// Failed attempts so far, per URL
    pub(super) failures: Mutex<HashMap<String, u32>>,

    pub(super) counters: CrawlCounters,
}

impl CrawlContext {
    fn outcome(&self) -> CrawlOutcome {
        CrawlOutcome {
            records: self.store.snapshot(),
            max_page: self.frontier.max_page(),
            listing_pages: self.counters.listing_pages.load(Ordering::Relaxed),
            detail_pages: self.counters.detail_pages.load(Ordering::Relaxed),
            failed_attempts: self.counters.failed_attempts.load(Ordering::Relaxed),
            abandoned: self
                .counters
                .abandoned
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

/// Main crawler coordinator structure
///
/// Owns one crawl run. All run state lives here and is dropped with it.
pub struct Coordinator {
    context: Arc<CrawlContext>,
    receiver: UnboundedReceiver<String>,
}

impl Coordinator {
    /// Creates a coordinator around the given fetch client and extractor
    ///
    /// # Arguments
    ///
    /// * `config` - Seed page and retry settings
    /// * `fetcher` - Fetch client; enforces parallelism and request spacing
    /// * `extractor` - Reads listing and detail documents
    pub fn new(
        config: &CrawlerConfig,
        fetcher: Arc<dyn FetchClient>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        let (queue, receiver) = WorkQueue::channel();

        let context = CrawlContext {
            fetcher,
            extractor,
            frontier: FrontierTracker::new(config.seed_page),
            completion: CompletionTracker::new(),
            store: RecordStore::new(),
            queue,
            max_retries: config.max_retries,
            failures: Mutex::new(HashMap::new()),
            counters: CrawlCounters::default(),
        };

        Self {
            context: Arc::new(context),
            receiver,
        }
    }

    /// Creates a coordinator using the HTTP fetcher and the guide extractor
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScraperError)` - The HTTP client or extractor could not be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        let extractor = GuideExtractor::from_config(&config.crawler)?;

        Ok(Self::new(
            &config.crawler,
            Arc::new(fetcher),
            Arc::new(extractor),
        ))
    }

    /// Runs the crawl until every issued unit of work is resolved
    ///
    /// Seeds the queue with the configured listing pages, dispatches until
    /// the outstanding count returns to zero, then closes the queue and
    /// waits for the dispatch loop to finish.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Records and counters of the drained crawl
    /// * `Err(ScraperError)` - A fetch task failed fatally or the dispatch
    ///   loop stopped early
    pub async fn run(self) -> Result<CrawlOutcome> {
        let Coordinator { context, receiver } = self;

        let seeds = context.frontier.seed_pages();
        tracing::info!("Seeding listing pages {}..={}", seeds.start(), seeds.end());
        context.completion.increment(seeds.clone().count());
        for page in seeds {
            context.queue.push(context.extractor.listing_url(page))?;
        }

        let mut dispatcher = tokio::spawn(dispatch(Arc::clone(&context), receiver));

        tokio::select! {
            joined = &mut dispatcher => {
                joined??;
                return Err(ScraperError::DispatchStopped {
                    outstanding: context.completion.outstanding(),
                });
            }
            () = context.completion.await_zero() => {}
        }

        tracing::info!("All work resolved, closing work queue");
        context.queue.close();
        dispatcher.await??;

        let outcome = context.outcome();
        tracing::info!(
            "Crawl complete: {} listing pages, {} guide pages, {} records",
            outcome.listing_pages,
            outcome.detail_pages,
            outcome.records.len()
        );

        Ok(outcome)
    }
}

/// Drains the work queue, spawning one task per URL
///
/// Returns once the queue is closed and every in-flight task has finished,
/// or as soon as a task fails fatally.
async fn dispatch(context: Arc<CrawlContext>, mut receiver: UnboundedReceiver<String>) -> Result<()> {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            next = receiver.recv() => match next {
                Some(url) => {
                    tracing::debug!("Enqueueing {}", url);
                    let context = Arc::clone(&context);
                    in_flight.spawn(async move { context.visit(url).await });
                }
                None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => joined??,
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        joined??;
    }

    Ok(())
}

/// Runs a complete crawl with the HTTP fetcher and guide extractor
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome> {
    Coordinator::from_config(config)?.run().await
}
