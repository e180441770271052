//! Guide-Scraper main entry point
//!
//! This is the command-line interface for the guide crawler and ranker.

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use guide_scraper::config::{read_config_with_hash, validate, Config, OutputConfig};
use guide_scraper::crawler::crawl;
use guide_scraper::output::{export_all, print_report, CrawlReport};
use guide_scraper::rank;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Guide-Scraper: crawls a paginated guide listing and exports ranked guide data
#[derive(Parser, Debug)]
#[command(name = "guide-scraper")]
#[command(version)]
#[command(about = "Crawls a paginated guide listing and exports ranked guide data", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every guide, rank the records and export them
    Scrape(ScrapeArgs),
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Formats to export to: json, csv, md
    #[arg(short = 'f', long = "format", value_name = "FORMAT", value_delimiter = ',')]
    formats: Vec<String>,

    /// Existing directory the data is exported to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Field to sort by with an optional strategy, e.g. platinum_rarity;desc.
    /// Earlier keys take priority.
    #[arg(short, long = "sort", value_name = "FIELD[;asc|desc]", value_delimiter = ',')]
    sort: Vec<String>,
}

impl ScrapeArgs {
    /// Command-line flags replace the matching `[output]` settings
    fn apply_overrides(&self, output: &mut OutputConfig) {
        if !self.formats.is_empty() {
            output.formats = self.formats.clone();
        }
        if let Some(dir) = &self.output_dir {
            output.directory = dir.display().to_string();
        }
        if !self.sort.is_empty() {
            output.sort = self.sort.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Scrape(args) => handle_scrape(args).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("guide_scraper=info,warn"),
            1 => EnvFilter::new("guide_scraper=debug,info"),
            2 => EnvFilter::new("guide_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the scrape command: validate, crawl, rank, export, report
async fn handle_scrape(args: ScrapeArgs) -> anyhow::Result<()> {
    let (mut config, config_hash) = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    args.apply_overrides(&mut config.output);

    // Everything is checked before the first request goes out
    validate(&config).context("Invalid configuration")?;
    let formats = config.output.export_formats()?;
    let sort_keys = config.output.sort_keys()?;
    let directory = config.output.directory_path();

    tracing::info!(
        "Crawling {}{} with parallelism {} and {}ms between requests",
        config.crawler.base_url,
        config.crawler.listing_path,
        config.crawler.parallelism,
        config.crawler.request_delay_ms
    );

    let started_at = Utc::now();
    let outcome = crawl(&config).await.context("Crawl failed")?;
    let finished_at = Utc::now();

    let record_count = outcome.records.len();
    tracing::info!("Sorting {} records by {} keys", record_count, sort_keys.len());
    let records = Arc::new(rank(outcome.records, &sort_keys));

    let summary = export_all(records, &formats, &directory).await;

    let report = CrawlReport {
        started_at,
        finished_at,
        config_hash,
        max_page: outcome.max_page,
        listing_pages: outcome.listing_pages,
        detail_pages: outcome.detail_pages,
        failed_attempts: outcome.failed_attempts,
        abandoned: outcome.abandoned,
        records: record_count,
        exported: summary.written,
        export_failures: summary
            .failed
            .into_iter()
            .map(|(format, e)| (format, e.to_string()))
            .collect(),
    };
    print_report(&report);

    Ok(())
}
