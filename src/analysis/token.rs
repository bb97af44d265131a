//! Token types for text analysis.
//!
//! A [`Token`] is one whitespace-delimited unit of a normalized document. Tokens
//! flow from a [`Tokenizer`](crate::analysis::tokenizer::Tokenizer) through
//! zero or more [`Filter`](crate::analysis::token_filter::Filter)s.
//!
//! # Examples
//!
//! ```
//! use tactician::analysis::token::Token;
//!
//! let token = Token::new("sale");
//! assert_eq!(token.text, "sale");
//! assert_eq!(token.len(), 4);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,
}

impl Token {
    /// Create a new token.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token { text: text.into() }
    }

    /// Get the length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("hello");
        assert_eq!(token.text, "hello");
        assert_eq!(token.len(), 5);
        assert!(!token.is_empty());
        assert_eq!(token.to_string(), "hello");
    }
}
