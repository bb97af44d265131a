//! Pipeline configuration.
//!
//! One configuration object covers the variation points of a run: how keywords
//! are mined and where ground truth comes from. It loads from JSON, and every
//! field is optional in the file.
//!
//! ```
//! use tactician::pipeline::config::{GroundTruthMode, PipelineConfig};
//!
//! let config: PipelineConfig =
//!     serde_json::from_str(r#"{"top_k": 10, "ground_truth_mode": "flag_column"}"#).unwrap();
//! assert_eq!(config.top_k, 10);
//! assert!(config.use_stopwords);
//! assert_eq!(config.ground_truth_mode, GroundTruthMode::FlagColumn);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TacticianError};
use crate::tactic::miner::MiningOptions;

/// Where ground truth for evaluation comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundTruthMode {
    /// No ground truth; metrics are not computed.
    #[default]
    None,
    /// Labels entered row by row.
    Manual,
    /// A separate table joined on the row identifier.
    Uploaded,
    /// The `<tactic>_flag` column of the ingested table.
    FlagColumn,
}

/// Configuration for [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Drop stop words while mining.
    pub use_stopwords: bool,
    /// Mine only documents that contain a seed term.
    pub restrict_mining_to_seed_matches: bool,
    /// Keep mined terms whose count is strictly greater than this.
    pub frequency_floor: Option<usize>,
    /// Maximum number of mined terms.
    pub top_k: usize,
    /// Source of ground truth.
    pub ground_truth_mode: GroundTruthMode,
    /// Replacement stop word list.
    pub stopwords: Option<Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            use_stopwords: true,
            restrict_mining_to_seed_matches: true,
            frequency_floor: Some(1),
            top_k: 20,
            ground_truth_mode: GroundTruthMode::None,
            stopwords: None,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no run can use.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(TacticianError::invalid_config("top_k must be at least 1"));
        }
        if let Some(stopwords) = &self.stopwords {
            if stopwords.iter().any(|word| word.trim().is_empty()) {
                return Err(TacticianError::invalid_config(
                    "stopwords must not contain empty entries",
                ));
            }
        }
        Ok(())
    }

    /// Mining options derived from this configuration.
    pub fn mining_options(&self) -> MiningOptions {
        MiningOptions {
            use_stopwords: self.use_stopwords,
            stopwords: self.stopwords.clone(),
            restrict_to_seed_matches: self.restrict_mining_to_seed_matches,
            frequency_floor: self.frequency_floor,
            top_k: self.top_k,
        }
    }
}
