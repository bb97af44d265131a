//! # Tactician
//!
//! Keyword-dictionary tagging of marketing tactics in short text records.
//!
//! ## Features
//!
//! - Text normalization and whitespace tokenization
//! - Keyword mining conditioned on a tactic's seed terms
//! - Editable category dictionaries with a strict JSON exchange format
//! - Whole-token multi-label classification
//! - Precision, recall and F1 against partial ground truth
//! - CSV ingest and export

pub mod analysis;
pub mod cli;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod tactic;

pub mod prelude {
    pub use crate::document::table::Table;
    pub use crate::error::{Result, TacticianError};
    pub use crate::pipeline::config::PipelineConfig;
    pub use crate::pipeline::{Pipeline, PipelineRun, Prediction};
    pub use crate::tactic::dictionary::Dictionary;
    pub use crate::tactic::evaluation::GroundTruth;
    pub use crate::tactic::seeds::{Tactic, default_tactics};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
