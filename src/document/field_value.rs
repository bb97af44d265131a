//! Field value types for table cells.
//!
//! Uploaded tables are loosely typed: a cell may hold text, a number, a boolean
//! or nothing at all. [`FieldValue`] captures that, and offers the two coercions
//! the pipeline needs: the string representation fed to the normalizer and the
//! truthiness of a `<tactic>_flag` cell.
//!
//! ```
//! use tactician::document::field_value::FieldValue;
//!
//! assert_eq!(FieldValue::Integer(7).to_text(), "7");
//! assert_eq!(FieldValue::Null.to_text(), "");
//! assert!(FieldValue::Text(" Yes ".to_string()).as_flag());
//! assert!(!FieldValue::Text("no".to_string()).as_flag());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cell text values that read as a set flag (compared case-insensitively).
const TRUTHY_TEXT: &[&str] = &["1", "true", "yes"];

/// Represents the value of one table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// Missing value
    Null,
}

impl FieldValue {
    /// Infer the value type from raw cell text.
    ///
    /// Empty cells are `Null`; then booleans, integers, floats and finally
    /// text are tried. A typed value is kept only when its string
    /// representation is exactly `value`, so `to_text` always gives back the
    /// cell as written: `01`, `1.0`, `1e3`, `Infinity` and `TRUE` stay text.
    pub fn infer(value: &str) -> Self {
        if value.is_empty() {
            return FieldValue::Null;
        }

        let typed = if let Ok(bool_val) = value.parse::<bool>() {
            FieldValue::Boolean(bool_val)
        } else if let Ok(int_val) = value.parse::<i64>() {
            FieldValue::Integer(int_val)
        } else if let Ok(float_val) = value.parse::<f64>() {
            FieldValue::Float(float_val)
        } else {
            return FieldValue::Text(value.to_string());
        };

        if typed.to_text() == value {
            typed
        } else {
            FieldValue::Text(value.to_string())
        }
    }

    /// The string representation of this value. `Null` renders as `""`.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Null => String::new(),
        }
    }

    /// Get the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Interpret this value as a boolean flag.
    ///
    /// Booleans map directly, numbers are set only when equal to 1, and text is
    /// set for `"1"`, `"true"` or `"yes"` (trimmed, any case) or a number equal
    /// to 1 such as `"1.0"`. Everything else, including `Null`, `""`, `"0"` and
    /// `"no"`, is unset.
    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Boolean(b) => *b,
            FieldValue::Integer(i) => *i == 1,
            FieldValue::Float(f) => *f == 1.0,
            FieldValue::Text(text) => {
                let text = text.trim();
                TRUTHY_TEXT.iter().any(|t| text.eq_ignore_ascii_case(t))
                    || text.parse::<f64>().is_ok_and(|f| f == 1.0)
            }
            FieldValue::Null => false,
        }
    }

    /// Check whether this value is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_inference() {
        assert_eq!(FieldValue::infer(""), FieldValue::Null);
        assert_eq!(FieldValue::infer("true"), FieldValue::Boolean(true));
        assert_eq!(FieldValue::infer("false"), FieldValue::Boolean(false));
        assert_eq!(FieldValue::infer("2024"), FieldValue::Integer(2024));
        assert_eq!(FieldValue::infer("19.99"), FieldValue::Float(19.99));
        assert_eq!(
            FieldValue::infer("Big sale"),
            FieldValue::Text("Big sale".to_string())
        );
    }

    #[test]
    fn test_inference_keeps_cell_text() {
        for cell in ["01", "1.0", "1e3", "Infinity", "+5", "-0", "TRUE", "2.50"] {
            let value = FieldValue::infer(cell);
            assert_eq!(value, FieldValue::Text(cell.to_string()), "{cell}");
            assert_eq!(value.to_text(), cell);
        }
        assert_eq!(FieldValue::infer("-3"), FieldValue::Integer(-3));
        assert_eq!(FieldValue::infer("0.5"), FieldValue::Float(0.5));
    }

    #[test]
    fn test_flag_truthy_values() {
        assert!(FieldValue::from("1").as_flag());
        assert!(FieldValue::from("true").as_flag());
        assert!(FieldValue::from("YES").as_flag());
        assert!(FieldValue::from("TRUE").as_flag());
        assert!(FieldValue::from("1.0").as_flag());
        assert!(FieldValue::Integer(1).as_flag());
        assert!(FieldValue::Float(1.0).as_flag());
        assert!(FieldValue::Boolean(true).as_flag());
    }

    #[test]
    fn test_flag_falsy_values() {
        assert!(!FieldValue::from("0").as_flag());
        assert!(!FieldValue::from("").as_flag());
        assert!(!FieldValue::from("no").as_flag());
        assert!(!FieldValue::from("maybe").as_flag());
        assert!(!FieldValue::Integer(0).as_flag());
        assert!(!FieldValue::Integer(2).as_flag());
        assert!(!FieldValue::Boolean(false).as_flag());
        assert!(!FieldValue::Null.as_flag());
    }

    #[test]
    fn test_to_text() {
        assert_eq!(FieldValue::Float(2.5).to_text(), "2.5");
        assert_eq!(FieldValue::Boolean(false).to_text(), "false");
        assert_eq!(FieldValue::from(None::<&str>).to_text(), "");
        assert_eq!(FieldValue::from(Some("x")).as_text(), Some("x"));
    }
}
