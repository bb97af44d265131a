//! Ground-truth reconciliation and scoring.

use tactician::document::converter::TableConverter;
use tactician::document::converter::csv::CsvTableConverter;
use tactician::pipeline::config::GroundTruthMode;
use tactician::pipeline::session::Session;
use tactician::prelude::*;
use tactician::tactic::evaluation::{LabelEncoding, MetricsRow, score};
use tactician::tactic::seeds::find_tactic;

fn session(mode: GroundTruthMode, input: &str) -> Result<Session> {
    let mut session = Session::new(PipelineConfig {
        ground_truth_mode: mode,
        ..PipelineConfig::default()
    })?;
    session.load_table(CsvTableConverter::new().convert_str(input)?);
    session.select_text_column("text")?;
    Ok(session)
}

#[test]
fn test_flag_column_truthiness() -> Result<()> {
    let input = "\
id,text,discount_marketing_flag
a,big sale,1
b,big sale,true
c,big sale,yes
d,big sale,0
e,big sale,
f,big sale,no
";
    let table = CsvTableConverter::new().convert_str(input)?;
    let ground_truth = GroundTruth::from_column(
        &table,
        "discount_marketing_flag",
        LabelEncoding::Flag,
        "discount_marketing",
    )?;

    let flagged = vec!["discount_marketing".to_string()];
    for id in ["a", "b", "c"] {
        assert_eq!(ground_truth.get(id), Some(flagged.as_slice()), "row {id}");
    }
    for id in ["d", "e", "f"] {
        assert_eq!(ground_truth.get(id), Some(&[][..]), "row {id}");
    }
    Ok(())
}

#[test]
fn test_flag_column_evaluation() -> Result<()> {
    let input = "\
id,text,discount_marketing_flag
1,Huge sale today,1
2,Free shipping,1
3,Limited deal,0
4,Just a note,1
5,Another note,0
";
    let tactic = find_tactic("discount_marketing").unwrap();
    let mut session = session(GroundTruthMode::FlagColumn, input)?;
    session.run(&tactic, None)?;

    let metrics = session.evaluate()?.metrics.unwrap();
    assert_eq!(metrics.scored_documents, 5);
    assert_eq!(metrics.rows, vec![MetricsRow::from_counts("discount_marketing", 2, 1, 1)]);
    Ok(())
}

#[test]
fn test_list_literal_column_with_bad_rows() -> Result<()> {
    let input = r#"id,text,labels
1,big sale,"[""discount_marketing""]"
2,trending now,"['social_proof']"
3,plain,
4,popular deal,"[""social_proof"", ""discount_marketing""]"
"#;
    let table = CsvTableConverter::new().convert_str(input)?;
    let ground_truth =
        GroundTruth::from_column(&table, "labels", LabelEncoding::List, "discount_marketing")?;

    assert_eq!(ground_truth.labeled_count(), 2);
    assert_eq!(ground_truth.get("2"), None);
    assert_eq!(ground_truth.get("3"), None);
    assert_eq!(ground_truth.warnings().len(), 1);
    Ok(())
}

#[test]
fn test_uploaded_ground_truth_joins_on_id() -> Result<()> {
    let input = "id,text\n7,big sale\n8,trending bags\n9,plain note\n";
    let upload = "id,labels\n9,[]\n7,\"[\"\"discount_marketing\"\"]\"\n";

    let tactic = find_tactic("discount_marketing").unwrap();
    let mut session = session(GroundTruthMode::Uploaded, input)?;
    session.upload_ground_truth(
        &CsvTableConverter::new().convert_str(upload)?,
        "id",
        "labels",
        &tactic.name,
    )?;
    session.run(&tactic, None)?;

    let metrics = session.evaluate()?.metrics.unwrap();
    // row 8 has no uploaded label and is not scored
    assert_eq!(metrics.scored_documents, 2);
    let row = &metrics.rows[0];
    assert_eq!((row.true_positive, row.false_positive, row.false_negative), (1, 0, 0));
    assert_eq!(row.f1, 1.0);
    Ok(())
}

#[test]
fn test_upload_without_label_column_keeps_state() -> Result<()> {
    let tactic = find_tactic("discount_marketing").unwrap();
    let mut session = session(GroundTruthMode::Uploaded, "id,text\n1,big sale\n")?;
    session.upload_ground_truth(
        &CsvTableConverter::new().convert_str("id,discount_marketing_flag\n1,1\n")?,
        "id",
        "discount_marketing_flag",
        &tactic.name,
    )?;

    let bad = CsvTableConverter::new().convert_str("id,other\n1,1\n")?;
    let err = session
        .upload_ground_truth(&bad, "id", "discount_marketing_flag", &tactic.name)
        .unwrap_err();
    assert!(err.is_schema());

    session.run(&tactic, None)?;
    let metrics = session.evaluate()?.metrics.unwrap();
    assert_eq!(metrics.rows[0].true_positive, 1);
    Ok(())
}

#[test]
fn test_manual_edits() -> Result<()> {
    let tactic = find_tactic("urgency_marketing").unwrap();
    let mut session = session(GroundTruthMode::Manual, "text\nact now\nhello\n")?;
    session.run(&tactic, None)?;

    // nothing labeled yet
    let evaluation = session.evaluate()?;
    assert!(evaluation.metrics.is_none());

    assert!(session.edit_label("0", r#"["urgency_marketing"]"#));
    assert!(!session.edit_label("1", "[urgency_marketing"));
    assert!(session.edit_label("1", "[]"));

    let metrics = session.evaluate()?.metrics.unwrap();
    assert_eq!(metrics.scored_documents, 2);
    assert_eq!(metrics.rows[0].precision, 1.0);
    assert_eq!(metrics.rows[0].recall, 1.0);
    Ok(())
}

#[test]
fn test_score_without_ground_truth_is_empty() -> Result<()> {
    let table = Table::from_texts("text", ["big sale"]);
    let tactic = find_tactic("discount_marketing").unwrap();
    let run = Pipeline::new(PipelineConfig::default())?.run(&table, "text", &tactic, None)?;

    assert!(score(run.predictions(), &GroundTruth::new(), &["discount_marketing"]).is_empty());
    Ok(())
}

#[test]
fn test_numeric_looking_ids_stay_distinct() -> Result<()> {
    let input = "id,text\n1,big sale\n1.0,plain\n01,note\n";
    let upload = "id,discount_marketing_flag\n1,1\n";

    let tactic = find_tactic("discount_marketing").unwrap();
    let mut session = session(GroundTruthMode::Uploaded, input)?;
    assert_eq!(session.table().unwrap().row_ids(), vec!["1", "1.0", "01"]);

    session.upload_ground_truth(
        &CsvTableConverter::new().convert_str(upload)?,
        "id",
        "discount_marketing_flag",
        &tactic.name,
    )?;
    session.run(&tactic, None)?;

    let metrics = session.evaluate()?.metrics.unwrap();
    assert_eq!(metrics.scored_documents, 1);
    assert_eq!(metrics.rows, vec![MetricsRow::from_counts("discount_marketing", 1, 0, 0)]);
    Ok(())
}
