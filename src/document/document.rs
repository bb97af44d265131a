//! Documents: one input row prepared for analysis.

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::document::table::Table;
use crate::error::Result;

/// One input row with its raw and normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable row identifier.
    pub id: String,
    /// Text cell as uploaded (string representation).
    pub raw_text: String,
    /// Lower-cased, alphanumeric-and-whitespace-only text.
    pub normalized_text: String,
}

impl Document {
    /// Create a document, normalizing `raw_text` with `normalizer`.
    pub fn new<S: Into<String>>(id: S, raw_text: S, normalizer: &TextNormalizer) -> Self {
        let raw_text = raw_text.into();
        let normalized_text = normalizer.normalize(&raw_text);
        Document {
            id: id.into(),
            raw_text,
            normalized_text,
        }
    }

    /// Build one document per table row from `text_column`.
    ///
    /// Fails with a schema error when the column does not exist. Missing and
    /// non-text cells are coerced to their string representation.
    pub fn from_table(
        table: &Table,
        text_column: &str,
        normalizer: &TextNormalizer,
    ) -> Result<Vec<Document>> {
        let ids = table.row_ids();
        let documents = table
            .column(text_column)?
            .into_iter()
            .zip(ids)
            .map(|(value, id)| Document::new(id, value.to_text(), normalizer))
            .collect();
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::field_value::FieldValue;

    #[test]
    fn test_from_table() {
        let normalizer = TextNormalizer::new().unwrap();
        let table = Table::new(["text", "score"])
            .with_row(vec!["Hurry, sale ends today!".into(), FieldValue::Integer(3)])
            .unwrap()
            .with_row(vec![FieldValue::Null, FieldValue::Integer(1)])
            .unwrap()
            .with_row(vec![FieldValue::Float(12.5), FieldValue::Null])
            .unwrap();

        let docs = Document::from_table(&table, "text", &normalizer).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].id, "0");
        assert_eq!(docs[0].normalized_text, "hurry sale ends today");
        assert_eq!(docs[1].raw_text, "");
        assert_eq!(docs[1].normalized_text, "");
        assert_eq!(docs[2].normalized_text, "125");
    }

    #[test]
    fn test_missing_text_column() {
        let normalizer = TextNormalizer::new().unwrap();
        let table = Table::from_texts("body", ["x"]);
        let err = Document::from_table(&table, "text", &normalizer).unwrap_err();
        assert!(err.is_schema());
    }
}
