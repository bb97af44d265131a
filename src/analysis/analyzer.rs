//! Core analyzer trait definition.
//!
//! An analyzer turns a normalized document into the tokens that are counted or
//! matched:
//!
//! ```text
//! Normalized Text → Analyzer → Token Stream
//!                     ↓
//!                 Tokenizer
//!                     ↓
//!                 Filter 1 … Filter N
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &str;

    /// Collect the surviving token texts.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}

pub mod pipeline;
