//! The classification pipeline.
//!
//! A [`Pipeline`] turns a table and a text column into a [`PipelineRun`]:
//!
//! ```text
//! table -> normalized documents -> mined keywords -> dictionary -> predictions
//! ```
//!
//! A run is immutable and self-contained. Recomputing (after a new upload, a
//! different text column, or an edited dictionary) builds a new run rather than
//! patching the previous one. Scoring against ground truth is a separate step
//! that reads a run and never changes it.
//!
//! # Examples
//!
//! ```
//! use tactician::document::table::Table;
//! use tactician::pipeline::Pipeline;
//! use tactician::pipeline::config::PipelineConfig;
//! use tactician::tactic::seeds::find_tactic;
//!
//! let table = Table::from_texts("text", ["Hurry, sale ends today!", "Just a normal note."]);
//! let tactic = find_tactic("discount_marketing").unwrap();
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let run = pipeline.run(&table, "text", &tactic, None).unwrap();
//!
//! assert_eq!(run.documents()[0].normalized_text, "hurry sale ends today");
//! assert_eq!(run.predictions()[0].categories, vec!["discount_marketing"]);
//! assert_eq!(run.predictions()[1].categories, vec!["uncategorized"]);
//! ```

pub mod config;
pub mod export;
pub mod session;

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::normalizer::TextNormalizer;
use crate::document::document::Document;
use crate::document::table::Table;
use crate::error::Result;
use crate::pipeline::config::PipelineConfig;
use crate::tactic::classifier::KeywordClassifier;
use crate::tactic::dictionary::{self, Dictionary};
use crate::tactic::evaluation::{self, GroundTruth, MetricsReport};
use crate::tactic::miner::{KeywordMiner, TermFrequencyTable};
use crate::tactic::seeds::Tactic;

pub use crate::tactic::classifier::Prediction;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A user-visible message about a recovered condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn info<S: Into<String>>(message: S) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Warning,
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level == DiagnosticLevel::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// How many documents were assigned a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFrequency {
    pub category: String,
    pub count: usize,
}

/// Count predicted categories, including `uncategorized`.
///
/// Sorted by descending count; ties keep the order categories were first seen.
pub fn category_frequencies(predictions: &[Prediction]) -> Vec<CategoryFrequency> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for prediction in predictions {
        for category in &prediction.categories {
            *counts.entry(category.as_str()).or_insert(0) += 1;
        }
    }

    let mut frequencies: Vec<CategoryFrequency> = counts
        .into_iter()
        .map(|(category, count)| CategoryFrequency {
            category: category.to_string(),
            count,
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies
}

/// Result of scoring a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Per-tactic metrics, or `None` when nothing could be scored.
    pub metrics: Option<MetricsReport>,
    /// Problems recovered while reconciling ground truth.
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    /// An evaluation that produced no metrics for `reason`.
    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        Evaluation {
            metrics: None,
            diagnostics: vec![Diagnostic::warning(reason)],
        }
    }
}

/// Everything one classification run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    id: Uuid,
    created_at: DateTime<Utc>,
    tactic: Tactic,
    text_column: String,
    documents: Vec<Document>,
    mined_terms: TermFrequencyTable,
    dictionary: Dictionary,
    predictions: Vec<Prediction>,
    diagnostics: Vec<Diagnostic>,
}

impl PipelineRun {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The designated tactic of this run.
    pub fn tactic(&self) -> &Tactic {
        &self.tactic
    }

    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn mined_terms(&self) -> &TermFrequencyTable {
        &self.mined_terms
    }

    /// The dictionary used for classification (generated or overridden).
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// One prediction per document, in row order.
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Category counts over this run's predictions.
    pub fn category_frequencies(&self) -> Vec<CategoryFrequency> {
        category_frequencies(&self.predictions)
    }

    /// Tactics reported by [`evaluate`](Self::evaluate): the dictionary's
    /// categories, then the designated tactic if the dictionary lacks it.
    pub fn scored_tactics(&self) -> Vec<&str> {
        let mut tactics = self.dictionary.categories();
        if !tactics.contains(&self.tactic.name.as_str()) {
            tactics.push(&self.tactic.name);
        }
        tactics
    }

    /// Score this run's predictions against `ground_truth`.
    pub fn evaluate(&self, ground_truth: &GroundTruth) -> Evaluation {
        let mut diagnostics: Vec<Diagnostic> = ground_truth
            .warnings()
            .iter()
            .map(Diagnostic::warning)
            .collect();

        let metrics = evaluation::evaluate(&self.predictions, ground_truth, &self.scored_tactics());
        if metrics.is_none() {
            diagnostics.push(Diagnostic::warning(
                "cannot compute metrics: no document has ground truth",
            ));
        }

        Evaluation {
            metrics,
            diagnostics,
        }
    }
}

/// Runs the normalize, mine, build and classify stages.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: TextNormalizer,
    miner: KeywordMiner,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let miner = KeywordMiner::new(config.mining_options());
        Ok(Pipeline {
            config,
            normalizer: TextNormalizer::new()?,
            miner,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Classify every row of `table` for `tactic`.
    ///
    /// `dictionary_override` is a user-edited dictionary in the JSON exchange
    /// format. When it cannot be parsed the generated dictionary is used and a
    /// warning is recorded on the run. A missing `text_column` is a schema
    /// error.
    pub fn run(
        &self,
        table: &Table,
        text_column: &str,
        tactic: &Tactic,
        dictionary_override: Option<&str>,
    ) -> Result<PipelineRun> {
        let mut diagnostics = Vec::new();

        let documents = Document::from_table(table, text_column, &self.normalizer)?;
        let normalized: Vec<&str> = documents
            .iter()
            .map(|document| document.normalized_text.as_str())
            .collect();

        let mined_terms = self.miner.mine(&normalized, &tactic.seed_terms)?;
        if mined_terms.is_empty() {
            diagnostics.push(Diagnostic::info(format!(
                "no contextual keywords found for '{}'; using seed terms only",
                tactic.name
            )));
        }

        let generated = dictionary::build(&tactic.name, &tactic.seed_terms, mined_terms.terms())?;
        let dictionary = match dictionary_override {
            Some(text) => {
                let outcome = dictionary::parse_override(text, &generated);
                if let Some(error) = outcome.error {
                    diagnostics.push(Diagnostic::warning(format!(
                        "dictionary override rejected ({error}); using the generated dictionary"
                    )));
                }
                outcome.dictionary
            }
            None => generated,
        };

        for (category, term) in dictionary.multi_word_terms() {
            diagnostics.push(Diagnostic::warning(format!(
                "term {term:?} in '{category}' contains whitespace and can never match"
            )));
        }

        let classifier = KeywordClassifier::new(dictionary);
        let predictions = documents
            .iter()
            .map(|document| {
                Prediction::new(
                    &classifier,
                    &document.id,
                    &document.normalized_text,
                    &tactic.name,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let run = PipelineRun {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            tactic: tactic.clone(),
            text_column: text_column.to_string(),
            documents,
            mined_terms,
            dictionary: classifier.dictionary().clone(),
            predictions,
            diagnostics,
        };

        log::info!(
            "run {}: classified {} documents for '{}' with {} categories ({} mined terms)",
            run.id,
            run.documents.len(),
            run.tactic.name,
            run.dictionary.len(),
            run.mined_terms.len()
        );

        Ok(run)
    }
}
