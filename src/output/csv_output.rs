//! CSV export

use crate::output::traits::{ExportError, Exporter, OutputResult};
use crate::output::ExportFormat;
use crate::record::{Field, Record};

/// Writes a header row of every field identifier followed by one row per record
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, records: &[Record]) -> OutputResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(Field::ALL.iter().map(Field::as_str))?;
        for record in records {
            writer.write_record(record.values())?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}
