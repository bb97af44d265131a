//! Category → term-set dictionaries.
//!
//! A [`Dictionary`] maps category names to sets of lower-cased terms. It is
//! either generated from a tactic's seed terms plus mined terms, or replaced
//! wholesale by a user-edited JSON object:
//!
//! ```json
//! {"urgency_marketing": ["now", "hurry"], "discount_marketing": ["sale"]}
//! ```
//!
//! Category order is preserved; it is the order the classifier reports matches
//! in. `uncategorized` is reserved for rows that match nothing. Terms containing whitespace are accepted but can never match, because
//! classification compares whole tokens.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TacticianError};
use crate::tactic::classifier::UNCATEGORIZED;

/// Mapping from category name to the terms that signal it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dictionary {
    categories: IndexMap<String, BTreeSet<String>>,
}

impl Dictionary {
    /// An empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) a category. Terms are case-folded and trimmed; empty
    /// terms are dropped.
    ///
    /// The name must be non-empty and must not be the reserved
    /// [`UNCATEGORIZED`] label.
    pub fn insert<I, S>(&mut self, category: &str, terms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let category = category.trim();
        if category.is_empty() {
            return Err(TacticianError::parse("category name must not be empty"));
        }
        if category == UNCATEGORIZED {
            return Err(TacticianError::parse(format!(
                "'{UNCATEGORIZED}' is reserved and cannot be a category"
            )));
        }

        let entry = self.categories.entry(category.to_string()).or_default();
        entry.extend(terms.into_iter().filter_map(|term| fold_term(term.as_ref())));
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_category<I, S>(mut self, category: &str, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(category, terms)?;
        Ok(self)
    }

    /// Iterate over categories in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.categories
            .iter()
            .map(|(category, terms)| (category.as_str(), terms))
    }

    /// Category names in order.
    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Terms of a category.
    pub fn terms(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check whether the dictionary has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Terms that contain whitespace and therefore never match a token.
    pub fn multi_word_terms(&self) -> Vec<(&str, &str)> {
        self.iter()
            .flat_map(|(category, terms)| {
                terms
                    .iter()
                    .filter(|term| term.chars().any(char::is_whitespace))
                    .map(move |term| (category, term.as_str()))
            })
            .collect()
    }

    /// Render as the JSON exchange format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the JSON exchange format strictly.
    ///
    /// The input must be an object whose keys are non-empty category names
    /// and whose values are arrays of strings. Anything else is rejected.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or_else(|| {
            TacticianError::parse("dictionary must be an object of category to term list")
        })?;

        let mut dictionary = Dictionary::new();
        for (category, terms) in object {
            let terms = terms.as_array().ok_or_else(|| {
                TacticianError::parse(format!("terms for '{category}' must be a list"))
            })?;

            let terms = terms
                .iter()
                .map(|term| {
                    term.as_str().ok_or_else(|| {
                        TacticianError::parse(format!(
                            "every term for '{category}' must be a string, found {term}"
                        ))
                    })
                })
                .collect::<Result<Vec<&str>>>()?;

            dictionary.insert(category, terms)?;
        }

        Ok(dictionary)
    }
}

/// Case-fold and trim a term; `None` when nothing remains.
fn fold_term(term: &str) -> Option<String> {
    let term = term.trim().to_lowercase();
    (!term.is_empty()).then_some(term)
}

/// Default single-category dictionary: `{tactic: seed_terms ∪ mined_terms}`.
pub fn build<I, S>(tactic: &str, seed_terms: &BTreeSet<String>, mined_terms: I) -> Result<Dictionary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut dictionary = Dictionary::new();
    dictionary.insert(tactic, seed_terms)?;
    dictionary.insert(tactic, mined_terms)?;
    Ok(dictionary)
}

/// Outcome of a user dictionary override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideOutcome {
    /// The dictionary to use: the parsed override or the fallback.
    pub dictionary: Dictionary,
    /// Whether the override was accepted.
    pub success: bool,
    /// Why the override was rejected.
    pub error: Option<String>,
}

/// Replace `fallback` with a user-supplied dictionary literal.
///
/// Never fails: on any parse or shape error the fallback is returned unchanged
/// with `success = false`, and the caller reports the message.
pub fn parse_override(text: &str, fallback: &Dictionary) -> OverrideOutcome {
    match Dictionary::from_json(text) {
        Ok(dictionary) => OverrideOutcome {
            dictionary,
            success: true,
            error: None,
        },
        Err(e) => {
            log::warn!("dictionary override rejected, keeping generated dictionary: {e}");
            OverrideOutcome {
                dictionary: fallback.clone(),
                success: false,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds() -> BTreeSet<String> {
        ["sale", "deal"].iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_build_merges_seed_and_mined_terms() {
        let dictionary = build("discount_marketing", &seeds(), ["shoes", "Deal", "bags"]).unwrap();

        assert_eq!(dictionary.categories(), vec!["discount_marketing"]);
        let terms: Vec<_> = dictionary
            .terms("discount_marketing")
            .unwrap()
            .iter()
            .cloned()
            .collect();
        assert_eq!(terms, vec!["bags", "deal", "sale", "shoes"]);
    }

    #[test]
    fn test_build_with_no_mined_terms_keeps_seeds() {
        let dictionary = build("discount_marketing", &seeds(), Vec::<String>::new()).unwrap();
        assert_eq!(dictionary.terms("discount_marketing"), Some(&seeds()));
    }

    #[test]
    fn test_override_preserves_category_order_and_folds_case() {
        let fallback = build("discount_marketing", &seeds(), Vec::<String>::new()).unwrap();
        let outcome = parse_override(
            r#"{"urgency_marketing": ["NOW", " Hurry "], "discount_marketing": ["Sale", "sale"], "empty": []}"#,
            &fallback,
        );

        assert!(outcome.success);
        assert!(outcome.error.is_none());
        let dictionary = outcome.dictionary;
        assert_eq!(
            dictionary.categories(),
            vec!["urgency_marketing", "discount_marketing", "empty"]
        );
        assert!(dictionary.terms("urgency_marketing").unwrap().contains("hurry"));
        assert_eq!(dictionary.terms("discount_marketing").unwrap().len(), 1);
        assert!(dictionary.terms("empty").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let fallback = build("discount_marketing", &seeds(), ["shoes"]).unwrap();

        for bad in [
            r#"{"urgency_marketing": ["now""#,
            r#"{'urgency_marketing': {'now', 'hurry'}}"#,
            r#"["now", "hurry"]"#,
            r#"{"urgency_marketing": "now"}"#,
            r#"{"urgency_marketing": ["now", 3]}"#,
            r#"{"": ["now"]}"#,
            "",
        ] {
            let outcome = parse_override(bad, &fallback);
            assert!(!outcome.success, "accepted {bad:?}");
            assert!(outcome.error.is_some());
            assert_eq!(outcome.dictionary, fallback);
        }
    }

    #[test]
    fn test_reserved_category_is_rejected() {
        assert!(Dictionary::new().insert(UNCATEGORIZED, ["sale"]).is_err());

        let fallback = build("discount_marketing", &seeds(), Vec::<String>::new()).unwrap();
        let outcome = parse_override(
            r#"{"uncategorized": ["sale"], "social_proof": ["popular"]}"#,
            &fallback,
        );
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("reserved"));
        assert_eq!(outcome.dictionary, fallback);
    }

    #[test]
    fn test_json_round_trip() {
        let dictionary = Dictionary::new()
            .with_category("social_proof", ["popular", "trending"])
            .unwrap()
            .with_category("discount_marketing", ["sale"])
            .unwrap();

        let json = dictionary.to_json().unwrap();
        let parsed = Dictionary::from_json(&json).unwrap();
        assert_eq!(parsed, dictionary);
        assert_eq!(parsed.categories(), vec!["social_proof", "discount_marketing"]);
    }

    #[test]
    fn test_multi_word_terms_reported() {
        let dictionary = Dictionary::new()
            .with_category("urgency_marketing", ["last chance", "now"])
            .unwrap();
        assert_eq!(
            dictionary.multi_word_terms(),
            vec![("urgency_marketing", "last chance")]
        );
    }
}
