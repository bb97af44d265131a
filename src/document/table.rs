//! In-memory tabular dataset.
//!
//! A [`Table`] is rows × named columns, the shape the presentation layer hands
//! to the pipeline. Tables are treated as immutable once built: a stage that
//! needs a different table builds a new one.

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;
use crate::error::{Result, TacticianError};

/// Name of the column that carries row identifiers, when present.
pub const ID_COLUMN: &str = "id";

/// A table of loosely typed cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must have exactly one cell per column.
    pub fn push_row(&mut self, row: Vec<FieldValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TacticianError::schema(format!(
                "row has {} cells but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder-style [`push_row`](Self::push_row).
    pub fn with_row(mut self, row: Vec<FieldValue>) -> Result<Self> {
        self.push_row(row)?;
        Ok(self)
    }

    /// Build a single-column table of text cells.
    pub fn from_texts<I, S>(column: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            columns: vec![column.to_string()],
            rows: texts
                .into_iter()
                .map(|text| vec![FieldValue::Text(text.into())])
                .collect(),
        }
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column, or a schema error naming it.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            TacticianError::schema(format!(
                "column '{}' not found (available: {})",
                name,
                self.columns.join(", ")
            ))
        })
    }

    /// All cells of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&FieldValue>> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// A single cell.
    pub fn cell(&self, row: usize, column: &str) -> Option<&FieldValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[FieldValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Stable identifier of a row.
    ///
    /// Uses the [`ID_COLUMN`] cell when the table has one and the cell is not
    /// empty, otherwise the 0-based row index.
    pub fn row_id(&self, row: usize) -> String {
        match self.cell(row, ID_COLUMN) {
            Some(value) if !value.is_null() => value.to_text(),
            _ => row.to_string(),
        }
    }

    /// Identifiers of every row, in order.
    pub fn row_ids(&self) -> Vec<String> {
        (0..self.len()).map(|row| self.row_id(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_checks_width() {
        let mut table = Table::new(["id", "text"]);
        assert!(table.push_row(vec![FieldValue::Integer(1), "hello".into()]).is_ok());
        let err = table.push_row(vec!["only one".into()]).unwrap_err();
        assert!(err.is_schema());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_row_ids_from_column() {
        let table = Table::new(["id", "text"])
            .with_row(vec![FieldValue::Integer(10), "a".into()])
            .unwrap()
            .with_row(vec![FieldValue::Null, "b".into()])
            .unwrap();

        assert_eq!(table.row_ids(), vec!["10", "1"]);
    }

    #[test]
    fn test_row_ids_from_position() {
        let table = Table::from_texts("text", ["a", "b", "c"]);
        assert_eq!(table.row_ids(), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = Table::from_texts("text", ["a"]);
        assert!(table.column("text").is_ok());
        let err = table.require_column("body").unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("body"));
    }
}
