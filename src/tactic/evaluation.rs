//! Scoring predictions against ground truth.
//!
//! Ground truth arrives in three shapes and is reconciled into one per-document
//! list of true categories before scoring:
//!
//! - a JSON list literal per row (`["urgency_marketing"]`), see [`parse_labels`]
//! - a `<tactic>_flag` column of booleans or 0/1 values, see [`parse_flag`]
//! - a separately uploaded table joined on the row identifier,
//!   see [`GroundTruth::from_upload`]
//!
//! Only documents with a non-missing ground truth are scored. Precision, recall
//! and F1 fall back to `0.0` whenever their denominator is zero.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::field_value::FieldValue;
use crate::document::table::Table;
use crate::error::{Result, TacticianError};
use crate::tactic::classifier::Prediction;
use crate::tactic::seeds::flag_column;

/// How a ground-truth label column is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelEncoding {
    /// JSON list of category names per cell.
    List,
    /// Boolean/0-1 cell meaning "the designated tactic applies".
    Flag,
}

impl LabelEncoding {
    /// `Flag` for a column named `<tactic>_flag`, otherwise `List`.
    pub fn detect(column: &str, tactic: &str) -> Self {
        if column == flag_column(tactic) {
            LabelEncoding::Flag
        } else {
            LabelEncoding::List
        }
    }
}

/// Result of parsing one row's label literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelParse {
    /// Parsed labels, the fallback on failure, or `None` when missing.
    pub labels: Option<Vec<String>>,
    /// Whether the literal was accepted.
    pub success: bool,
    /// Why the literal was rejected.
    pub error: Option<String>,
}

/// Parse a per-row label literal: a JSON array of strings.
///
/// Blank text means "no ground truth" and is not an error. On any parse or
/// shape error `fallback` is returned with `success = false`.
///
/// ```
/// use tactician::tactic::evaluation::parse_labels;
///
/// let parsed = parse_labels(r#"["social_proof", "discount_marketing"]"#, None);
/// assert!(parsed.success);
/// assert_eq!(parsed.labels.unwrap(), vec!["social_proof", "discount_marketing"]);
///
/// let fallback = vec!["social_proof".to_string()];
/// let parsed = parse_labels("['social_proof'", Some(&fallback));
/// assert!(!parsed.success);
/// assert_eq!(parsed.labels, Some(fallback));
/// ```
pub fn parse_labels(text: &str, fallback: Option<&Vec<String>>) -> LabelParse {
    if text.trim().is_empty() {
        return LabelParse {
            labels: None,
            success: true,
            error: None,
        };
    }

    match labels_from_json(text) {
        Ok(labels) => LabelParse {
            labels: Some(labels),
            success: true,
            error: None,
        },
        Err(e) => LabelParse {
            labels: fallback.cloned(),
            success: false,
            error: Some(e.to_string()),
        },
    }
}

fn labels_from_json(text: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(text)?;
    let items = value
        .as_array()
        .ok_or_else(|| TacticianError::parse("labels must be a list of category names"))?;

    let mut labels: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let label = item
            .as_str()
            .ok_or_else(|| TacticianError::parse(format!("label must be a string, found {item}")))?
            .trim();
        if !label.is_empty() && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    Ok(labels)
}

/// Convert a flag cell into `[tactic]` or `[]`.
pub fn parse_flag(value: &FieldValue, tactic: &str) -> Vec<String> {
    if value.as_flag() {
        vec![tactic.to_string()]
    } else {
        Vec::new()
    }
}

/// True categories per document identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruth {
    labels: IndexMap<String, Option<Vec<String>>>,
    warnings: Vec<String>,
}

impl GroundTruth {
    /// Empty ground truth (nothing labeled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or clear, with `None`) the labels of a document.
    pub fn set<S: Into<String>>(&mut self, id: S, labels: Option<Vec<String>>) {
        self.labels.insert(id.into(), labels);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with<S: Into<String>>(mut self, id: S, labels: Option<Vec<String>>) -> Self {
        self.set(id, labels);
        self
    }

    /// Manually edit a row from its literal text.
    ///
    /// On a parse error the row keeps its previous value, a warning is recorded
    /// and `false` is returned.
    pub fn edit_literal(&mut self, id: &str, text: &str) -> bool {
        let previous = self.labels.get(id).and_then(Option::as_ref);
        let parsed = parse_labels(text, previous);
        if let Some(error) = parsed.error {
            self.warn(format!("row {id}: label list rejected ({error}); kept previous value"));
        }
        self.labels.insert(id.to_string(), parsed.labels);
        parsed.success
    }

    /// Build from `(id, literal cell)` pairs.
    pub fn from_literals<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, &'a FieldValue)>,
    {
        let mut ground_truth = GroundTruth::new();
        for (id, value) in rows {
            let labels = match value {
                FieldValue::Null => None,
                other => {
                    let parsed = parse_labels(&other.to_text(), None);
                    if let Some(error) = parsed.error {
                        ground_truth.warn(format!(
                            "row {id}: label list rejected ({error}); treated as unlabeled"
                        ));
                    }
                    parsed.labels
                }
            };
            ground_truth.labels.insert(id, labels);
        }
        ground_truth
    }

    /// Build from `(id, flag cell)` pairs for `tactic`.
    pub fn from_flags<'a, I>(rows: I, tactic: &str) -> Self
    where
        I: IntoIterator<Item = (String, &'a FieldValue)>,
    {
        let mut ground_truth = GroundTruth::new();
        for (id, value) in rows {
            ground_truth.labels.insert(id, Some(parse_flag(value, tactic)));
        }
        ground_truth
    }

    /// Read a label column of the ingested table, keyed by its row identifiers.
    pub fn from_column(
        table: &Table,
        column: &str,
        encoding: LabelEncoding,
        tactic: &str,
    ) -> Result<Self> {
        let cells = table.column(column)?;
        let rows = table.row_ids().into_iter().zip(cells);
        Ok(match encoding {
            LabelEncoding::List => Self::from_literals(rows),
            LabelEncoding::Flag => Self::from_flags(rows, tactic),
        })
    }

    /// Read an uploaded ground-truth table joined on `id_column`.
    ///
    /// Fails with a schema error when either column is missing. Rows with an
    /// empty identifier are skipped with a warning.
    pub fn from_upload(
        table: &Table,
        id_column: &str,
        label_column: &str,
        encoding: LabelEncoding,
        tactic: &str,
    ) -> Result<Self> {
        let ids = table.column(id_column)?;
        let cells = table.column(label_column)?;

        let mut skipped = 0;
        let rows: Vec<(String, &FieldValue)> = ids
            .into_iter()
            .zip(cells)
            .filter_map(|(id, cell)| {
                if id.is_null() {
                    skipped += 1;
                    None
                } else {
                    Some((id.to_text(), cell))
                }
            })
            .collect();

        let mut ground_truth = match encoding {
            LabelEncoding::List => Self::from_literals(rows),
            LabelEncoding::Flag => Self::from_flags(rows, tactic),
        };
        if skipped > 0 {
            ground_truth.warn(format!(
                "{skipped} uploaded rows have no '{id_column}' value and were skipped"
            ));
        }
        Ok(ground_truth)
    }

    /// Labels of a document, if it has ground truth.
    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.labels.get(id).and_then(|labels| labels.as_deref())
    }

    /// Number of documents with non-missing ground truth.
    pub fn labeled_count(&self) -> usize {
        self.labels.values().filter(|labels| labels.is_some()).count()
    }

    /// Check whether no document has ground truth.
    pub fn is_empty(&self) -> bool {
        self.labeled_count() == 0
    }

    /// Recovered parse problems, in the order they occurred.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Confusion counts and derived scores for one tactic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub tactic: String,
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl MetricsRow {
    /// Derive precision, recall and F1 from counts, using `0.0` for any ratio
    /// whose denominator is zero.
    pub fn from_counts(
        tactic: &str,
        true_positive: usize,
        false_positive: usize,
        false_negative: usize,
    ) -> Self {
        let precision = ratio(true_positive, true_positive + false_positive);
        let recall = ratio(true_positive, true_positive + false_negative);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        MetricsRow {
            tactic: tactic.to_string(),
            true_positive,
            false_positive,
            false_negative,
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Per-tactic metrics plus how many documents were scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub scored_documents: usize,
    pub rows: Vec<MetricsRow>,
}

/// Score predictions for each tactic.
///
/// Returns an empty list when no prediction has ground truth; callers must
/// report that metrics are unavailable rather than show zeros.
pub fn score<S: AsRef<str>>(
    predictions: &[Prediction],
    ground_truth: &GroundTruth,
    tactics: &[S],
) -> Vec<MetricsRow> {
    evaluate(predictions, ground_truth, tactics)
        .map(|report| report.rows)
        .unwrap_or_default()
}

/// Score predictions, or `None` when nothing can be scored.
pub fn evaluate<S: AsRef<str>>(
    predictions: &[Prediction],
    ground_truth: &GroundTruth,
    tactics: &[S],
) -> Option<MetricsReport> {
    let scored: Vec<(&Prediction, &[String])> = predictions
        .iter()
        .filter_map(|prediction| {
            ground_truth
                .get(&prediction.id)
                .map(|truth| (prediction, truth))
        })
        .collect();

    if scored.is_empty() {
        log::warn!("no document has ground truth; metrics cannot be computed");
        return None;
    }

    let rows = tactics
        .iter()
        .map(|tactic| {
            let tactic = tactic.as_ref();
            let (mut tp, mut fp, mut fn_) = (0, 0, 0);
            for (prediction, truth) in &scored {
                let predicted = prediction.categories.iter().any(|c| c == tactic);
                let actual = truth.iter().any(|c| c == tactic);
                match (predicted, actual) {
                    (true, true) => tp += 1,
                    (true, false) => fp += 1,
                    (false, true) => fn_ += 1,
                    (false, false) => {}
                }
            }
            MetricsRow::from_counts(tactic, tp, fp, fn_)
        })
        .collect();

    log::info!("scored {} documents", scored.len());

    Some(MetricsReport {
        scored_documents: scored.len(),
        rows,
    })
}
