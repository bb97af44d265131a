//! Converters that build a [`Table`] from uploaded files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::document::table::Table;
use crate::error::Result;

pub mod csv;

/// A trait for converting a file format into a [`Table`].
///
/// # Example
///
/// ```no_run
/// use tactician::document::converter::TableConverter;
/// use tactician::document::converter::csv::CsvTableConverter;
///
/// let table = CsvTableConverter::new().convert_path("posts.csv").unwrap();
/// println!("{} rows, columns: {:?}", table.len(), table.columns());
/// ```
pub trait TableConverter {
    /// Read a whole table from a reader.
    fn convert<R: Read>(&self, reader: R) -> Result<Table>;

    /// Read a whole table from a file.
    fn convert_path<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let file = File::open(path.as_ref())?;
        self.convert(file)
    }

    /// Read a whole table from an in-memory string.
    fn convert_str(&self, input: &str) -> Result<Table> {
        self.convert(input.as_bytes())
    }
}
