//! Command implementations for the Tactician CLI.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::converter::TableConverter;
use crate::document::converter::csv::CsvTableConverter;
use crate::document::table::Table;
use crate::error::{Result, TacticianError};
use crate::pipeline::config::{GroundTruthMode, PipelineConfig};
use crate::pipeline::export::{ExportPaths, export_to_dir};
use crate::pipeline::session::Session;
use crate::pipeline::{Diagnostic, PipelineRun};
use crate::tactic::seeds::{Tactic, default_tactics, find_tactic};

/// Execute a CLI command.
pub fn execute_command(args: TacticianArgs) -> Result<()> {
    match &args.command {
        Command::Tactics => list_tactics(&args),
        Command::Mine(mine_args) => mine_keywords(mine_args, &args),
        Command::Classify(classify_args) => classify(classify_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
    }
}

/// List the built-in tactics.
fn list_tactics(cli_args: &TacticianArgs) -> Result<()> {
    output_result(
        "Built-in tactics",
        &TacticList {
            tactics: default_tactics(),
        },
        cli_args,
    )
}

/// Mine keywords without classifying.
fn mine_keywords(args: &MineArgs, cli_args: &TacticianArgs) -> Result<()> {
    let config = load_config(&args.run)?;
    let tactic = resolve_tactic(&args.run.tactic)?;
    let run = run_session(&args.run, config, &tactic, None)?;

    output_result(
        "Keyword mining finished",
        &MiningResult {
            tactic: tactic.name.clone(),
            documents: run.documents().len(),
            keywords: run.mined_terms().clone(),
            diagnostics: run.diagnostics().to_vec(),
        },
        cli_args,
    )
}

/// Classify every row and export the result tables.
fn classify(args: &ClassifyArgs, cli_args: &TacticianArgs) -> Result<()> {
    let config = load_config(&args.run)?;
    let tactic = resolve_tactic(&args.run.tactic)?;
    let dictionary = read_dictionary(args.dictionary.as_deref())?;
    let run = run_session(&args.run, config, &tactic, dictionary.as_deref())?;

    let paths = export_to_dir(&args.output_dir, &run, None)?;

    output_result(
        "Classification finished",
        &ClassificationResult {
            run_id: run.id().to_string(),
            tactic: tactic.name.clone(),
            documents: run.predictions().len(),
            tactic_matches: run.predictions().iter().filter(|p| p.tactic_flag).count(),
            dictionary: args.show_dictionary.then(|| run.dictionary().clone()),
            category_frequencies: run.category_frequencies(),
            exported: exported_paths(&paths),
            diagnostics: run.diagnostics().to_vec(),
        },
        cli_args,
    )
}

/// Classify and score against ground truth.
fn evaluate(args: &EvaluateArgs, cli_args: &TacticianArgs) -> Result<()> {
    let mut config = load_config(&args.run)?;
    let tactic = resolve_tactic(&args.run.tactic)?;
    let dictionary = read_dictionary(args.dictionary.as_deref())?;

    let table = load_table(&args.run.input)?;
    let flag_column = tactic.flag_column();

    // explicit sources first, then the conventional flag column
    let upload = match &args.ground_truth {
        Some(path) => Some(load_table(path)?),
        None => None,
    };
    let label_column = match (&upload, &args.label_column) {
        (Some(_), _) => None,
        (None, Some(column)) => Some(column.clone()),
        (None, None) if table.has_column(&flag_column) => Some(flag_column.clone()),
        (None, None) => None,
    };
    config.ground_truth_mode = match (&upload, &label_column) {
        (Some(_), _) => GroundTruthMode::Uploaded,
        (None, Some(column)) if *column == flag_column => GroundTruthMode::FlagColumn,
        (None, Some(_)) => GroundTruthMode::Manual,
        (None, None) => config.ground_truth_mode,
    };
    log::debug!("ground truth mode: {:?}", config.ground_truth_mode);

    let mut session = Session::new(config)?;
    session.load_table(table);
    session.select_text_column(&args.run.text_column)?;

    if let Some(upload) = &upload {
        let truth_column = args.truth_column.as_deref().unwrap_or(&flag_column);
        session.upload_ground_truth(upload, &args.id_column, truth_column, &tactic.name)?;
    } else if let Some(column) = &label_column {
        session.load_labels_from_column(column, &tactic.name)?;
    }

    session.run(&tactic, dictionary.as_deref())?;
    let evaluation = session.evaluate()?;
    let run = session
        .current_run()
        .ok_or_else(|| TacticianError::other("classification produced no run"))?;

    let exported = match &args.output_dir {
        Some(dir) => {
            let ground_truth = session.ground_truth();
            let ground_truth = (!ground_truth.is_empty()).then_some(ground_truth);
            exported_paths(&export_to_dir(dir, run, ground_truth)?)
        }
        None => Vec::new(),
    };

    let mut diagnostics: Vec<Diagnostic> = run.diagnostics().to_vec();
    diagnostics.extend(evaluation.diagnostics);

    let (scored_documents, metrics) = match evaluation.metrics {
        Some(report) => (report.scored_documents, report.rows),
        None => (0, Vec::new()),
    };

    output_result(
        "Evaluation finished",
        &EvaluationResult {
            run_id: run.id().to_string(),
            tactic: tactic.name.clone(),
            scored_documents,
            metrics,
            exported,
            diagnostics,
        },
        cli_args,
    )
}

/// Load the configuration file (if any) and apply command line overrides.
fn load_config(args: &RunArgs) -> Result<PipelineConfig> {
    let config = match &args.config {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    let config = args.apply(config);
    config.validate()?;
    Ok(config)
}

fn resolve_tactic(name: &str) -> Result<Tactic> {
    find_tactic(name).ok_or_else(|| {
        let available: Vec<String> = default_tactics().into_iter().map(|t| t.name).collect();
        TacticianError::invalid_argument(format!(
            "unknown tactic '{name}' (available: {})",
            available.join(", ")
        ))
    })
}

fn load_table(path: &Path) -> Result<Table> {
    log::debug!("reading {}", path.display());
    let table = CsvTableConverter::new()
        .convert_path(path)
        .with_context(|| format!("reading table '{}'", path.display()))?;
    Ok(table)
}

fn read_dictionary(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading dictionary '{}'", path.display()))?;
    Ok(Some(text))
}

/// Load the input, select its text column and run the pipeline once.
fn run_session(
    args: &RunArgs,
    config: PipelineConfig,
    tactic: &Tactic,
    dictionary: Option<&str>,
) -> Result<PipelineRun> {
    let mut session = Session::new(config)?;
    session.load_table(load_table(&args.input)?);
    session.select_text_column(&args.text_column)?;
    let run = session.run(tactic, dictionary)?;
    Ok(run.clone())
}

fn exported_paths(paths: &ExportPaths) -> Vec<String> {
    [&paths.results, &paths.category_frequencies, &paths.keywords]
        .into_iter()
        .map(|path: &PathBuf| path.display().to_string())
        .collect()
}
