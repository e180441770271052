//! Crawl report generation
//!
//! Summarizes one crawl run: what was fetched, how often fetches had to be
//! retried, and what ended up in the export.

use crate::output::ExportFormat;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// When the crawl phase started
    pub started_at: DateTime<Utc>,

    /// When the crawl phase drained
    pub finished_at: DateTime<Utc>,

    /// SHA-256 of the config file, if one was used
    pub config_hash: Option<String>,

    /// Highest listing page index discovered
    pub max_page: u32,

    /// Listing pages successfully processed
    pub listing_pages: usize,

    /// Detail pages successfully processed
    pub detail_pages: usize,

    /// Fetch or parse attempts that failed and were requeued
    pub failed_attempts: usize,

    /// URLs given up on after exhausting their retries
    pub abandoned: Vec<String>,

    /// Distinct records collected
    pub records: usize,

    /// Files written per format
    pub exported: Vec<(ExportFormat, PathBuf)>,

    /// Formats that failed to export, with the reason
    pub export_failures: Vec<(ExportFormat, String)>,
}

impl CrawlReport {
    /// Returns the crawl duration in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Formats a report as the text printed at the end of a run
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Report ===\n\n");
    out.push_str("Run:\n");
    out.push_str(&format!("  Started: {}\n", report.started_at.to_rfc3339()));
    out.push_str(&format!("  Finished: {}\n", report.finished_at.to_rfc3339()));
    out.push_str(&format!("  Duration: {}s\n", report.duration_seconds()));
    if let Some(hash) = &report.config_hash {
        out.push_str(&format!("  Config hash: {}\n", hash));
    }
    out.push('\n');

    out.push_str("Crawl:\n");
    out.push_str(&format!(
        "  Listing pages: {} (max page {})\n",
        report.listing_pages, report.max_page
    ));
    out.push_str(&format!("  Guide pages: {}\n", report.detail_pages));
    out.push_str(&format!(
        "  Failed attempts (requeued): {}\n",
        report.failed_attempts
    ));
    out.push_str(&format!("  Records: {}\n", report.records));

    if !report.abandoned.is_empty() {
        out.push_str(&format!("\nAbandoned URLs ({}):\n", report.abandoned.len()));
        for url in &report.abandoned {
            out.push_str(&format!("  - {}\n", url));
        }
    }

    if !report.exported.is_empty() || !report.export_failures.is_empty() {
        out.push_str("\nExports:\n");
        for (format, path) in &report.exported {
            out.push_str(&format!("  {}: {}\n", format, path.display()));
        }
        for (format, reason) in &report.export_failures {
            out.push_str(&format!("  {}: FAILED ({})\n", format, reason));
        }
    }

    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
