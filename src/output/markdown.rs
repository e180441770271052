//! Markdown table export
//!
//! One row per guide, with the game name linking to the guide page. The
//! link column itself is folded into the name column.

use crate::output::traits::{Exporter, OutputResult};
use crate::output::ExportFormat;
use crate::record::{Field, Record};

/// Name shown when a guide page had no recognizable game title
const MISSING_NAME: &str = "Game name not found";

/// Writes records as a Markdown table
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn render(&self, records: &[Record]) -> OutputResult<Vec<u8>> {
        Ok(format_markdown_table(records).into_bytes())
    }
}

/// Formats records as a Markdown table
///
/// # Arguments
///
/// * `records` - Ranked records
///
/// # Returns
///
/// A formatted markdown string; just the header and alignment rows when
/// `records` is empty
pub fn format_markdown_table(records: &[Record]) -> String {
    let columns: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|field| *field != Field::Link)
        .collect();

    let mut md = String::new();

    // Header
    md.push('|');
    for field in &columns {
        md.push_str(&format!(" **{}** |", field));
    }
    md.push('\n');

    md.push_str("|:--------|");
    for _ in 1..columns.len() {
        md.push_str(":------:|");
    }
    md.push('\n');

    for record in records {
        let name = if record.name.is_empty() {
            MISSING_NAME
        } else {
            record.name.as_str()
        };

        md.push_str(&format!("| [{}]({}) |", escape_cell(name), record.link));
        for field in &columns[1..] {
            md.push_str(&format!(" {} |", escape_cell(record.get(*field))));
        }
        md.push('\n');
    }

    md
}

/// Escapes characters that would break a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
