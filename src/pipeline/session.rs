//! Interactive session state.
//!
//! A [`Session`] holds what a presentation layer keeps between user actions:
//! the ingested table, the selected text column, the latest [`PipelineRun`]
//! and the ground truth gathered so far. Its state transitions follow a few
//! rules:
//!
//! - loading a table, or selecting a different text column, discards the run
//!   and the ground truth wholesale
//! - re-running replaces the previous run object
//! - an operation that fails with an error leaves the session untouched

use crate::document::table::Table;
use crate::error::{Result, TacticianError};
use crate::pipeline::config::{GroundTruthMode, PipelineConfig};
use crate::pipeline::{Evaluation, Pipeline, PipelineRun};
use crate::tactic::evaluation::{GroundTruth, LabelEncoding};
use crate::tactic::seeds::Tactic;

/// State carried between interactive steps.
#[derive(Debug)]
pub struct Session {
    pipeline: Pipeline,
    table: Option<Table>,
    text_column: Option<String>,
    run: Option<PipelineRun>,
    ground_truth: GroundTruth,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Session {
            pipeline: Pipeline::new(config)?,
            table: None,
            text_column: None,
            run: None,
            ground_truth: GroundTruth::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        self.pipeline.config()
    }

    /// Replace the ingested table and discard everything derived from the old one.
    pub fn load_table(&mut self, table: Table) {
        log::debug!(
            "loaded table with {} rows and {} columns",
            table.len(),
            table.columns().len()
        );
        self.table = Some(table);
        self.text_column = None;
        self.reset();
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Select the column classified as text.
    ///
    /// Choosing a different column discards the run and the ground truth.
    pub fn select_text_column(&mut self, column: &str) -> Result<()> {
        self.require_table()?.require_column(column)?;

        if self.text_column.as_deref() != Some(column) {
            self.text_column = Some(column.to_string());
            self.reset();
        }
        Ok(())
    }

    pub fn text_column(&self) -> Option<&str> {
        self.text_column.as_deref()
    }

    /// Run the pipeline over the current table and column, replacing any
    /// previous run.
    pub fn run(&mut self, tactic: &Tactic, dictionary_override: Option<&str>) -> Result<&PipelineRun> {
        let table = self.require_table()?;
        let text_column = self
            .text_column
            .as_deref()
            .ok_or_else(|| TacticianError::invalid_argument("no text column selected"))?;

        let run = self.pipeline.run(table, text_column, tactic, dictionary_override)?;
        let run: &PipelineRun = self.run.insert(run);
        Ok(run)
    }

    /// The latest run, if any.
    pub fn current_run(&self) -> Option<&PipelineRun> {
        self.run.as_ref()
    }

    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }

    /// Manually set one row's labels from a list literal.
    ///
    /// Returns `false` when the literal is rejected; the row keeps its previous
    /// labels.
    pub fn edit_label(&mut self, id: &str, text: &str) -> bool {
        self.ground_truth.edit_literal(id, text)
    }

    /// Prefill ground truth from a label column of the ingested table.
    ///
    /// A column named `<tactic>_flag` is read as flags, anything else as list
    /// literals.
    pub fn load_labels_from_column(&mut self, column: &str, tactic: &str) -> Result<()> {
        let table = self.require_table()?;
        let encoding = LabelEncoding::detect(column, tactic);
        self.ground_truth = GroundTruth::from_column(table, column, encoding, tactic)?;
        Ok(())
    }

    /// Replace ground truth with an uploaded table joined on `id_column`.
    ///
    /// A missing column is a schema error and the current ground truth is kept.
    pub fn upload_ground_truth(
        &mut self,
        upload: &Table,
        id_column: &str,
        label_column: &str,
        tactic: &str,
    ) -> Result<()> {
        let encoding = LabelEncoding::detect(label_column, tactic);
        let ground_truth =
            GroundTruth::from_upload(upload, id_column, label_column, encoding, tactic)?;

        log::info!(
            "uploaded ground truth for {} rows",
            ground_truth.labeled_count()
        );
        self.ground_truth = ground_truth;
        Ok(())
    }

    /// Score the latest run using the configured ground truth source.
    pub fn evaluate(&self) -> Result<Evaluation> {
        let run = self
            .run
            .as_ref()
            .ok_or_else(|| TacticianError::invalid_argument("nothing has been classified yet"))?;

        match self.config().ground_truth_mode {
            GroundTruthMode::None => Ok(Evaluation::unavailable(
                "cannot compute metrics: ground truth is disabled",
            )),
            GroundTruthMode::FlagColumn => {
                let tactic = &run.tactic().name;
                let ground_truth = GroundTruth::from_column(
                    self.require_table()?,
                    &run.tactic().flag_column(),
                    LabelEncoding::Flag,
                    tactic,
                )?;
                Ok(run.evaluate(&ground_truth))
            }
            GroundTruthMode::Manual | GroundTruthMode::Uploaded => {
                Ok(run.evaluate(&self.ground_truth))
            }
        }
    }

    fn require_table(&self) -> Result<&Table> {
        self.table
            .as_ref()
            .ok_or_else(|| TacticianError::invalid_argument("no table has been loaded"))
    }

    fn reset(&mut self) {
        self.run = None;
        self.ground_truth = GroundTruth::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::field_value::FieldValue;
    use crate::tactic::seeds::find_tactic;

    fn config(mode: GroundTruthMode) -> PipelineConfig {
        PipelineConfig {
            ground_truth_mode: mode,
            ..PipelineConfig::default()
        }
    }

    fn table() -> Table {
        Table::new(["id", "text", "discount_marketing_flag"])
            .with_row(vec!["a".into(), "Big SALE!".into(), FieldValue::Integer(1)])
            .unwrap()
            .with_row(vec!["b".into(), "plain note".into(), "yes".into()])
            .unwrap()
            .with_row(vec!["c".into(), "free stuff".into(), FieldValue::Null])
            .unwrap()
    }

    #[test]
    fn test_run_requires_table_and_column() {
        let tactic = find_tactic("discount_marketing").unwrap();
        let mut session = Session::new(PipelineConfig::default()).unwrap();
        assert!(session.run(&tactic, None).is_err());

        session.load_table(table());
        assert!(session.run(&tactic, None).is_err());

        assert!(session.select_text_column("body").unwrap_err().is_schema());
        assert_eq!(session.text_column(), None);

        session.select_text_column("text").unwrap();
        let run = session.run(&tactic, None).unwrap();
        assert_eq!(run.predictions().len(), 3);
    }

    #[test]
    fn test_column_change_discards_run_and_ground_truth() {
        let tactic = find_tactic("discount_marketing").unwrap();
        let mut session = Session::new(config(GroundTruthMode::Manual)).unwrap();
        session.load_table(table());
        session.select_text_column("text").unwrap();
        session.run(&tactic, None).unwrap();
        assert!(session.edit_label("a", r#"["discount_marketing"]"#));

        // reselecting the same column keeps state
        session.select_text_column("text").unwrap();
        assert!(session.current_run().is_some());
        assert_eq!(session.ground_truth().labeled_count(), 1);

        session.select_text_column("id").unwrap();
        assert!(session.current_run().is_none());
        assert!(session.ground_truth().is_empty());
    }

    #[test]
    fn test_failed_upload_keeps_ground_truth() {
        let mut session = Session::new(config(GroundTruthMode::Uploaded)).unwrap();
        session.load_table(table());
        session.edit_label("a", r#"["discount_marketing"]"#);

        let upload = Table::new(["row", "labels"]);
        let err = session
            .upload_ground_truth(&upload, "id", "labels", "discount_marketing")
            .unwrap_err();
        assert!(err.is_schema());
        assert_eq!(session.ground_truth().labeled_count(), 1);
    }

    #[test]
    fn test_evaluate_with_flag_column() {
        let tactic = find_tactic("discount_marketing").unwrap();
        let mut session = Session::new(config(GroundTruthMode::FlagColumn)).unwrap();
        session.load_table(table());
        session.select_text_column("text").unwrap();
        session.run(&tactic, None).unwrap();

        let metrics = session.evaluate().unwrap().metrics.unwrap();
        // a: predicted and flagged, b: flagged only, c: predicted only
        let row = &metrics.rows[0];
        assert_eq!(metrics.scored_documents, 3);
        assert_eq!((row.true_positive, row.false_positive, row.false_negative), (1, 1, 1));
    }

    #[test]
    fn test_evaluate_disabled() {
        let tactic = find_tactic("discount_marketing").unwrap();
        let mut session = Session::new(PipelineConfig::default()).unwrap();
        assert!(session.evaluate().is_err());

        session.load_table(table());
        session.select_text_column("text").unwrap();
        session.run(&tactic, None).unwrap();

        let evaluation = session.evaluate().unwrap();
        assert!(evaluation.metrics.is_none());
        assert!(evaluation.diagnostics[0].is_warning());
    }

    #[test]
    fn test_load_labels_from_flag_column() {
        let mut session = Session::new(config(GroundTruthMode::Manual)).unwrap();
        session.load_table(table());
        session
            .load_labels_from_column("discount_marketing_flag", "discount_marketing")
            .unwrap();

        assert_eq!(
            session.ground_truth().get("b"),
            Some(&["discount_marketing".to_string()][..])
        );
        assert_eq!(session.ground_truth().get("c"), Some(&[][..]));
    }
}
