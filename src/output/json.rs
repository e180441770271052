//! JSON export

use crate::output::traits::{Exporter, OutputResult};
use crate::output::ExportFormat;
use crate::record::Record;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Writes records as a pretty-printed JSON array, one-space indented
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, records: &[Record]) -> OutputResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b" ");
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;
        Ok(buffer)
    }
}
