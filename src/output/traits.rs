//! Exporter trait and error types
//!
//! This module defines the trait every export format implements and the
//! errors an export can fail with.

use crate::output::ExportFormat;
use crate::record::Record;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, ExportError>;

/// Renders ranked records into one output format
///
/// Implementations must produce a structurally valid document for an empty
/// record list (an empty array, a header-only table).
pub trait Exporter: Send + Sync {
    /// The format this exporter writes
    fn format(&self) -> ExportFormat;

    /// Renders the records, in the given order, to bytes
    fn render(&self, records: &[Record]) -> OutputResult<Vec<u8>>;

    /// Renders the records and writes them into `directory`
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(ExportError)` - Rendering or writing failed
    fn export(&self, records: &[Record], directory: &Path) -> OutputResult<PathBuf> {
        let content = self.render(records)?;
        let path = directory.join(self.format().file_name());
        fs::write(&path, content)?;
        Ok(path)
    }
}
