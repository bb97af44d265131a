//! Rule-based multi-label classification against a [`Dictionary`].
//!
//! A category matches a document when any of its terms equals one of the
//! document's whitespace tokens. Matching is whole-token only: `"sale"` does not
//! match `"wholesale"`, and a term with an internal space never matches.
//!
//! # Examples
//!
//! ```
//! use tactician::tactic::classifier::{Classifier, KeywordClassifier, UNCATEGORIZED};
//! use tactician::tactic::dictionary::Dictionary;
//!
//! let dictionary = Dictionary::new()
//!     .with_category("urgency_marketing", ["hurry", "today"]).unwrap()
//!     .with_category("discount_marketing", ["sale"]).unwrap();
//! let classifier = KeywordClassifier::new(dictionary);
//!
//! assert_eq!(
//!     classifier.classify("hurry sale ends today").unwrap(),
//!     vec!["urgency_marketing", "discount_marketing"]
//! );
//! assert_eq!(classifier.classify("just a note").unwrap(), vec![UNCATEGORIZED]);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;
use crate::tactic::dictionary::Dictionary;

/// Label reported when no category matches.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Classifier trait.
///
/// Implementations return the matched categories of a normalized document,
/// never an empty list.
pub trait Classifier: Send + Sync {
    /// Classify one normalized document.
    fn classify(&self, normalized_text: &str) -> Result<Vec<String>>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

/// Dictionary keyword classifier with whole-token matching.
pub struct KeywordClassifier {
    dictionary: Dictionary,
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for KeywordClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordClassifier")
            .field("dictionary", &self.dictionary)
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl KeywordClassifier {
    /// Create a classifier over `dictionary` using whitespace tokenization.
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_tokenizer(dictionary, Arc::new(WhitespaceTokenizer::new()))
    }

    /// Create a classifier with a custom tokenizer.
    pub fn with_tokenizer(dictionary: Dictionary, tokenizer: Arc<dyn Tokenizer>) -> Self {
        for (category, term) in dictionary.multi_word_terms() {
            log::warn!(
                "term {term:?} in category '{category}' contains whitespace and will never match"
            );
        }

        KeywordClassifier {
            dictionary,
            tokenizer,
        }
    }

    /// The dictionary this classifier applies.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, normalized_text: &str) -> Result<Vec<String>> {
        let tokens: HashSet<String> = self
            .tokenizer
            .tokenize(normalized_text)?
            .map(|token| token.text)
            .collect();

        let matched: Vec<String> = self
            .dictionary
            .iter()
            .filter(|(_, terms)| terms.iter().any(|term| tokens.contains(term)))
            .map(|(category, _)| category.to_string())
            .collect();

        if matched.is_empty() {
            Ok(vec![UNCATEGORIZED.to_string()])
        } else {
            Ok(matched)
        }
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Classification of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Row identifier of the document.
    pub id: String,
    /// Matched categories in dictionary order, or `[UNCATEGORIZED]`.
    pub categories: Vec<String>,
    /// Whether the designated tactic was predicted.
    pub tactic_flag: bool,
}

impl Prediction {
    /// Classify a document and derive its flag for `tactic`.
    pub fn new<C: Classifier + ?Sized>(
        classifier: &C,
        id: &str,
        normalized_text: &str,
        tactic: &str,
    ) -> Result<Self> {
        let categories = classifier.classify(normalized_text)?;
        let tactic_flag = tactic_flag(&categories, tactic);
        Ok(Prediction {
            id: id.to_string(),
            categories,
            tactic_flag,
        })
    }
}

/// Whether `tactic` is among the predicted categories.
pub fn tactic_flag<S: AsRef<str>>(categories: &[S], tactic: &str) -> bool {
    categories.iter().any(|category| category.as_ref() == tactic)
}
