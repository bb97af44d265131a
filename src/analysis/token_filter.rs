//! Token filter implementations for token transformation.
//!
//! Filters receive the stream produced by a tokenizer and return a new one.
//!
//! # Available Filters
//!
//! - [`stop::StopFilter`] - Removes stop words
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Stop Words → Seed-term exclusion → Counting
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// The trait requires `Send + Sync` so filters can be shared behind an `Arc`.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod stop;
