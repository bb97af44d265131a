//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TacticianArgs};
use crate::error::Result;
use crate::pipeline::{CategoryFrequency, Diagnostic};
use crate::tactic::dictionary::Dictionary;
use crate::tactic::evaluation::MetricsRow;
use crate::tactic::miner::TermFrequencyTable;
use crate::tactic::seeds::Tactic;

/// Built-in tactics.
#[derive(Debug, Serialize, Deserialize)]
pub struct TacticList {
    pub tactics: Vec<Tactic>,
}

/// Result of keyword mining.
#[derive(Debug, Serialize)]
pub struct MiningResult {
    pub tactic: String,
    pub documents: usize,
    pub keywords: TermFrequencyTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a classification run.
#[derive(Debug, Serialize)]
pub struct ClassificationResult {
    pub run_id: String,
    pub tactic: String,
    pub documents: usize,
    pub tactic_matches: usize,
    pub dictionary: Option<Dictionary>,
    pub category_frequencies: Vec<CategoryFrequency>,
    pub exported: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of an evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluationResult {
    pub run_id: String,
    pub tactic: String,
    pub scored_documents: usize,
    pub metrics: Vec<MetricsRow>,
    pub exported: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rendering of a result for a terminal.
pub trait HumanOutput {
    fn write_human(&self, args: &TacticianArgs);
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &TacticianArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.write_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &TacticianArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic], args: &TacticianArgs) {
    if args.verbosity() == 0 {
        return;
    }
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

impl HumanOutput for TacticList {
    fn write_human(&self, _args: &TacticianArgs) {
        println!("Tactics:");
        println!("════════");
        for tactic in &self.tactics {
            let seeds: Vec<&str> = tactic.seed_terms.iter().map(String::as_str).collect();
            println!("  {:<20} {}", tactic.name, seeds.join(", "));
        }
    }
}

impl HumanOutput for MiningResult {
    fn write_human(&self, args: &TacticianArgs) {
        print_diagnostics(&self.diagnostics, args);

        println!("Top keywords for {} ({} documents):", self.tactic, self.documents);
        println!("═══════════════════════════════════");
        if self.keywords.is_empty() {
            println!("  (none)");
        }
        for entry in self.keywords.iter() {
            println!("  {:<20} {:>6}", entry.term, entry.count);
        }
    }
}

impl HumanOutput for ClassificationResult {
    fn write_human(&self, args: &TacticianArgs) {
        print_diagnostics(&self.diagnostics, args);

        println!(
            "Classified {} documents, {} tagged {}",
            self.documents, self.tactic_matches, self.tactic
        );
        if args.verbosity() > 1 {
            println!("Run: {}", self.run_id);
        }

        println!();
        println!("Category frequencies:");
        println!("═════════════════════");
        for frequency in &self.category_frequencies {
            println!("  {:<24} {:>6}", frequency.category, frequency.count);
        }

        if let Some(dictionary) = &self.dictionary {
            println!();
            println!("Dictionary:");
            println!("═══════════");
            for (category, terms) in dictionary.iter() {
                let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
                println!("  {category}: {}", terms.join(", "));
            }
        }

        if !self.exported.is_empty() {
            println!();
            for path in &self.exported {
                println!("Wrote {path}");
            }
        }
    }
}

impl HumanOutput for EvaluationResult {
    fn write_human(&self, args: &TacticianArgs) {
        print_diagnostics(&self.diagnostics, args);

        if self.metrics.is_empty() {
            println!("Metrics unavailable: no document has ground truth.");
        } else {
            println!("Metrics over {} labeled documents:", self.scored_documents);
            println!("═══════════════════════════════════");
            println!(
                "  {:<24} {:>4} {:>4} {:>4} {:>9} {:>9} {:>9}",
                "tactic", "TP", "FP", "FN", "precision", "recall", "f1"
            );
            for row in &self.metrics {
                println!(
                    "  {:<24} {:>4} {:>4} {:>4} {:>9.3} {:>9.3} {:>9.3}",
                    row.tactic,
                    row.true_positive,
                    row.false_positive,
                    row.false_negative,
                    row.precision,
                    row.recall,
                    row.f1
                );
            }
        }

        for path in &self.exported {
            println!("Wrote {path}");
        }
    }
}
