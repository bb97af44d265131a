//! CSV exports of a pipeline run.
//!
//! Three tables are written:
//!
//! - per-row results: `id`, `text`, `normalized_text`, `categories` (a JSON
//!   list), `<tactic>_flag` (`1`/`0`) and, when ground truth is given,
//!   `ground_truth` (a JSON list, empty when the row is unlabeled)
//! - category frequencies: `category`, `count`
//! - mined keyword frequencies: `keyword`, `count`
//!
//! The results table can be read back as a ground-truth upload, joined on
//! `id` with either the `categories` or the flag column as labels.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::error::Result;
use crate::pipeline::{CategoryFrequency, PipelineRun};
use crate::tactic::evaluation::GroundTruth;
use crate::tactic::miner::TermFrequencyTable;

/// File name of the per-row results table.
pub const RESULTS_FILE: &str = "classified_results.csv";
/// File name of the category frequency table.
pub const CATEGORY_FREQUENCIES_FILE: &str = "category_frequencies.csv";
/// File name of the mined keyword table.
pub const KEYWORDS_FILE: &str = "top_keywords.csv";

/// Column holding the predicted categories in the results table.
pub const CATEGORIES_COLUMN: &str = "categories";
/// Column holding the ground truth in the results table.
pub const GROUND_TRUTH_COLUMN: &str = "ground_truth";

/// Write the per-row results table.
pub fn write_results<W: Write>(
    writer: W,
    run: &PipelineRun,
    ground_truth: Option<&GroundTruth>,
) -> Result<()> {
    let mut csv = Writer::from_writer(writer);

    let flag_column = run.tactic().flag_column();
    let mut header = vec!["id", "text", "normalized_text", CATEGORIES_COLUMN, flag_column.as_str()];
    if ground_truth.is_some() {
        header.push(GROUND_TRUTH_COLUMN);
    }
    csv.write_record(&header)?;

    for (document, prediction) in run.documents().iter().zip(run.predictions()) {
        let categories = serde_json::to_string(&prediction.categories)?;
        let flag = if prediction.tactic_flag { "1" } else { "0" };
        let mut record = vec![
            document.id.clone(),
            document.raw_text.clone(),
            document.normalized_text.clone(),
            categories,
            flag.to_string(),
        ];
        if let Some(ground_truth) = ground_truth {
            let labels = match ground_truth.get(&document.id) {
                Some(labels) => serde_json::to_string(labels)?,
                None => String::new(),
            };
            record.push(labels);
        }
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the category frequency table.
pub fn write_category_frequencies<W: Write>(
    writer: W,
    frequencies: &[CategoryFrequency],
) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["category", "count"])?;
    for frequency in frequencies {
        let count = frequency.count.to_string();
        csv.write_record([frequency.category.as_str(), count.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the mined keyword table.
pub fn write_keyword_frequencies<W: Write>(writer: W, terms: &TermFrequencyTable) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["keyword", "count"])?;
    for entry in terms.iter() {
        let count = entry.count.to_string();
        csv.write_record([entry.term.as_str(), count.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Paths written by [`export_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub results: PathBuf,
    pub category_frequencies: PathBuf,
    pub keywords: PathBuf,
}

/// Write all three tables into `dir`, creating it if needed.
pub fn export_to_dir<P: AsRef<Path>>(
    dir: P,
    run: &PipelineRun,
    ground_truth: Option<&GroundTruth>,
) -> Result<ExportPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let paths = ExportPaths {
        results: dir.join(RESULTS_FILE),
        category_frequencies: dir.join(CATEGORY_FREQUENCIES_FILE),
        keywords: dir.join(KEYWORDS_FILE),
    };

    write_results(File::create(&paths.results)?, run, ground_truth)?;
    write_category_frequencies(
        File::create(&paths.category_frequencies)?,
        &run.category_frequencies(),
    )?;
    write_keyword_frequencies(File::create(&paths.keywords)?, run.mined_terms())?;

    log::info!("exported run {} to {}", run.id(), dir.display());
    Ok(paths)
}
