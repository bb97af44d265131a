//! Text analysis module for Tactician.
//!
//! Normalization, tokenization and token filtering shared by keyword mining and
//! classification.

pub mod analyzer;
pub mod char_filter;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
