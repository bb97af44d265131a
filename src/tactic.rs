//! Tactic dictionaries: seed terms, keyword mining, classification and scoring.

pub mod classifier;
pub mod dictionary;
pub mod evaluation;
pub mod miner;
pub mod seeds;
