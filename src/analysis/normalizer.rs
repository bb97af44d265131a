//! Text normalization for raw cell values.
//!
//! The normalizer lower-cases its input and deletes every character that is not
//! an ASCII letter, an ASCII digit or whitespace. Whitespace runs are left as
//! they are; the [`WhitespaceTokenizer`](crate::analysis::tokenizer::whitespace::WhitespaceTokenizer)
//! ignores the empty gaps.
//!
//! # Examples
//!
//! ```
//! use tactician::analysis::normalizer::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new().unwrap();
//! assert_eq!(normalizer.normalize("Hurry, sale ends today!"), "hurry sale ends today");
//! ```

use std::sync::Arc;

use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::document::field_value::FieldValue;
use crate::error::Result;

/// Characters kept by the default normalizer (everything else is removed).
pub const KEEP_PATTERN: &str = r"[^a-zA-Z0-9\s]";

/// Applies a chain of char filters to produce token-ready text.
#[derive(Clone)]
pub struct TextNormalizer {
    char_filters: Vec<Arc<dyn CharFilter>>,
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.char_filters.iter().map(|c| c.name()).collect();
        f.debug_struct("TextNormalizer")
            .field("char_filters", &names)
            .finish()
    }
}

impl TextNormalizer {
    /// Create the default normalizer: lowercase, then strip non-alphanumerics.
    pub fn new() -> Result<Self> {
        Ok(Self::empty()
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::remove(KEEP_PATTERN)?)))
    }

    /// A normalizer with no char filters (identity).
    pub fn empty() -> Self {
        TextNormalizer {
            char_filters: Vec::new(),
        }
    }

    /// Append a char filter to the chain.
    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    /// Normalize a string. Never fails.
    pub fn normalize(&self, text: &str) -> String {
        self.char_filters
            .iter()
            .fold(text.to_string(), |acc, char_filter| char_filter.filter(&acc))
    }

    /// Normalize a table cell through its string representation.
    pub fn normalize_value(&self, value: &FieldValue) -> String {
        self.normalize(&value.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new().unwrap()
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        let n = normalizer();
        assert_eq!(n.normalize("Hurry, sale ends today!"), "hurry sale ends today");
        assert_eq!(n.normalize("Just a normal note."), "just a normal note");
        assert_eq!(n.normalize("50% OFF -- today only"), "50 off  today only");
    }

    #[test]
    fn test_normalize_non_ascii_letters_removed() {
        let n = normalizer();
        assert_eq!(n.normalize("Café Déjà vu"), "caf dj vu");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        let samples = [
            "Hurry, sale ends today!",
            "  MIXED\tcase\nLines ",
            "Ünïcödé & symbols #1 @home",
            "",
            "İstanbul",
        ];
        for sample in samples {
            let once = n.normalize(sample);
            assert_eq!(n.normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_normalize_values() {
        let n = normalizer();
        assert_eq!(n.normalize_value(&FieldValue::Integer(42)), "42");
        assert_eq!(n.normalize_value(&FieldValue::Float(3.5)), "35");
        assert_eq!(n.normalize_value(&FieldValue::Boolean(true)), "true");
        assert_eq!(n.normalize_value(&FieldValue::Null), "");
    }

    #[test]
    fn test_empty_normalizer_is_identity() {
        assert_eq!(TextNormalizer::empty().normalize("A, b!"), "A, b!");
    }
}
