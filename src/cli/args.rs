//! Command line argument parsing for the Tactician CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::pipeline::config::PipelineConfig;

/// Tactician - keyword-dictionary tagging of marketing tactics in short texts
#[derive(Parser, Debug, Clone)]
#[command(name = "tactician")]
#[command(about = "Tag marketing tactics in short texts with keyword dictionaries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TacticianArgs {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TacticianArgs {
    /// Effective verbosity: 0 quiet, 1 normal (default), 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the built-in tactics and their seed terms
    Tactics,

    /// Mine contextual keywords for a tactic
    Mine(MineArgs),

    /// Classify every row and export the result tables
    Classify(ClassifyArgs),

    /// Classify and score against ground truth
    Evaluate(EvaluateArgs),
}

/// Input table, text column, tactic and pipeline settings shared by commands.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// CSV file to classify
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Column holding the text
    #[arg(short = 'c', long, default_value = "text")]
    pub text_column: String,

    /// Tactic of interest
    #[arg(short, long, default_value = "urgency_marketing")]
    pub tactic: String,

    /// Pipeline configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "TACTICIAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of mined keywords
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Keep mined keywords seen more often than this
    #[arg(long, conflicts_with = "no_frequency_floor")]
    pub frequency_floor: Option<usize>,

    /// Keep every mined keyword regardless of count
    #[arg(long)]
    pub no_frequency_floor: bool,

    /// Count stop words while mining
    #[arg(long)]
    pub keep_stopwords: bool,

    /// Mine every document, not only those containing a seed term
    #[arg(long)]
    pub mine_all: bool,
}

impl RunArgs {
    /// Apply command line overrides on top of `config`.
    pub fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(floor) = self.frequency_floor {
            config.frequency_floor = Some(floor);
        }
        if self.no_frequency_floor {
            config.frequency_floor = None;
        }
        if self.keep_stopwords {
            config.use_stopwords = false;
        }
        if self.mine_all {
            config.restrict_mining_to_seed_matches = false;
        }
        config
    }
}

/// Arguments for keyword mining
#[derive(Args, Debug, Clone)]
pub struct MineArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for classification
#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Edited dictionary file (JSON object of category to term list)
    #[arg(short, long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// Directory receiving the exported tables
    #[arg(short, long, default_value = "tactician-output")]
    pub output_dir: PathBuf,

    /// Print the dictionary in use as JSON
    #[arg(long)]
    pub show_dictionary: bool,
}

/// Arguments for evaluation
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Edited dictionary file (JSON object of category to term list)
    #[arg(short, long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// Label column of the input table (`<tactic>_flag` or JSON lists)
    #[arg(long, conflicts_with = "ground_truth")]
    pub label_column: Option<String>,

    /// Separate ground-truth CSV joined on the identifier column
    #[arg(short, long, value_name = "GROUND_TRUTH_FILE")]
    pub ground_truth: Option<PathBuf>,

    /// Identifier column of the ground-truth file
    #[arg(long, default_value = "id")]
    pub id_column: String,

    /// Label column of the ground-truth file (defaults to `<tactic>_flag`)
    #[arg(long)]
    pub truth_column: Option<String>,

    /// Also export the result tables to this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Output formats available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
