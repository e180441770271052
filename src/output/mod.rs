//! Output module for exporting ranked records and reporting on a crawl
//!
//! This module handles:
//! - Rendering ranked records as JSON, CSV and Markdown
//! - Writing every requested format concurrently, each failure isolated
//! - Summarizing the crawl run

mod csv_output;
mod json;
mod markdown;
pub mod stats;
mod traits;

pub use csv_output::CsvExporter;
pub use json::JsonExporter;
pub use markdown::{format_markdown_table, MarkdownExporter};
pub use stats::{format_report, print_report, CrawlReport};
pub use traits::{ExportError, Exporter, OutputResult};

use crate::record::Record;
use crate::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    /// All formats in the order they are listed to users
    pub const ALL: [ExportFormat; 3] = [Self::Json, Self::Csv, Self::Markdown];

    /// Returns the identifier accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "md",
        }
    }

    /// Returns the file name this format is written to
    pub fn file_name(&self) -> String {
        format!("guide_data.{}", self.as_str())
    }

    /// Returns the exporter for this format
    pub fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            Self::Json => Box::new(JsonExporter),
            Self::Csv => Box::new(CsvExporter),
            Self::Markdown => Box::new(MarkdownExporter),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

/// Outcome of exporting one record list to several formats
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Formats written successfully, with their file path
    pub written: Vec<(ExportFormat, PathBuf)>,

    /// Formats that failed, with the error
    pub failed: Vec<(ExportFormat, ExportError)>,
}

/// Writes `records` in every requested format
///
/// Each format is written on its own blocking task. A failing format is
/// logged and recorded in the summary; it never stops the other formats.
///
/// # Arguments
///
/// * `records` - Ranked records, written in the given order
/// * `formats` - Formats to write
/// * `directory` - Existing directory the files are written into
pub async fn export_all(
    records: Arc<Vec<Record>>,
    formats: &[ExportFormat],
    directory: &Path,
) -> ExportSummary {
    let mut tasks = JoinSet::new();

    for &format in formats {
        let records = Arc::clone(&records);
        let directory = directory.to_path_buf();
        tasks.spawn_blocking(move || {
            tracing::info!("Exporting {} records to .{}", records.len(), format);
            (format, format.exporter().export(&records, &directory))
        });
    }

    let mut summary = ExportSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((format, Ok(path))) => {
                tracing::info!("Wrote {}", path.display());
                summary.written.push((format, path));
            }
            Ok((format, Err(e))) => {
                tracing::error!("Failed to export to {}: {}", format, e);
                summary.failed.push((format, e));
            }
            Err(e) => {
                tracing::error!("Export task failed: {}", e);
            }
        }
    }

    // Report in request order rather than completion order
    let position = |format: &ExportFormat| formats.iter().position(|f| f == format);
    summary.written.sort_by_key(|(format, _)| position(format));
    summary.failed.sort_by_key(|(format, _)| position(format));

    summary
}
