//! CSV format table converter.
//!
//! The first row holds column names; every following row becomes a table row:
//! ```csv
//! id,text,discount_marketing_flag
//! 1,"Hurry, sale ends today!",1
//! 2,Just a normal note.,0
//! ```

use std::io::Read;

use csv::ReaderBuilder;

use crate::document::converter::TableConverter;
use crate::document::field_value::FieldValue;
use crate::document::table::Table;
use crate::error::{Result, TacticianError};

/// A table converter for CSV format.
///
/// Cell types are inferred with [`FieldValue::infer`]: empty cells become
/// `Null`, then booleans, integers, floats and text are tried in that order.
/// Inference never changes a cell's string representation.
#[derive(Debug, Clone)]
pub struct CsvTableConverter {
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Whether to trim whitespace from fields
    trim: bool,
    /// Whether to allow flexible field counts
    flexible: bool,
}

impl Default for CsvTableConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTableConverter {
    /// Create a new CSV converter with comma delimiter.
    pub fn new() -> Self {
        CsvTableConverter {
            delimiter: b',',
            trim: true,
            flexible: false,
        }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter as u8;
        self
    }

    /// Set whether to trim whitespace from fields.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Set whether to allow flexible field counts.
    ///
    /// Short rows are padded with `Null`, long rows are truncated.
    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }
}

impl TableConverter for CsvTableConverter {
    fn convert<R: Read>(&self, reader: R) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { csv::Trim::All } else { csv::Trim::None })
            .flexible(self.flexible)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| TacticianError::parse(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(TacticianError::parse("CSV header is empty"));
        }

        let mut table = Table::new(headers.iter());

        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                TacticianError::parse(format!("Failed to read CSV record {}: {}", line + 1, e))
            })?;

            let mut row: Vec<FieldValue> = record.iter().map(FieldValue::infer).collect();
            row.resize(headers.len(), FieldValue::Null);
            table.push_row(row)?;
        }

        log::debug!(
            "read CSV table with {} rows and {} columns",
            table.len(),
            table.columns().len()
        );

        Ok(table)
    }
}
