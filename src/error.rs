//! Error types for the Tactician library.
//!
//! All fatal errors are represented by the [`TacticianError`] enum. Recoverable
//! conditions (a malformed dictionary literal, a row whose label list cannot be
//! parsed, a document set with no seed matches) are not errors: they fall back
//! to a safe value and are reported as diagnostics on the pipeline run.
//!
//! # Examples
//!
//! ```
//! use tactician::error::{Result, TacticianError};
//!
//! fn require_column(present: bool) -> Result<()> {
//!     if !present {
//!         return Err(TacticianError::schema("column 'text' not found"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_column(true).is_ok());
//! assert!(require_column(false).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Tactician operations.
#[derive(Error, Debug)]
pub enum TacticianError {
    /// I/O errors (reading uploads, writing exports)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Analysis-related errors (normalization, tokenization, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Table shape errors (missing text, identifier or label column)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Parse errors for exchange formats
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid pipeline configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Error carrying context, rendered with its full cause chain
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with TacticianError.
pub type Result<T> = std::result::Result<T, TacticianError>;

impl TacticianError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TacticianError::Analysis(msg.into())
    }

    /// Create a new schema (table shape) error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        TacticianError::Schema(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        TacticianError::Parse(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TacticianError::InvalidConfig(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TacticianError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TacticianError::Other(msg.into())
    }

    /// Whether this error is a table shape mismatch.
    pub fn is_schema(&self) -> bool {
        matches!(self, TacticianError::Schema(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TacticianError::schema("missing column 'id'");
        assert_eq!(error.to_string(), "Schema error: missing column 'id'");
        assert!(error.is_schema());

        let error = TacticianError::analysis("bad pattern");
        assert_eq!(error.to_string(), "Analysis error: bad pattern");
        assert!(!error.is_schema());

        let error = TacticianError::invalid_config("top_k must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: top_k must be positive"
        );
    }

    #[test]
    fn test_context_chain_is_rendered() {
        use anyhow::Context;

        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "No such file"));
        let error = TacticianError::from(
            result
                .context("reading dictionary 'dict.json'")
                .unwrap_err(),
        );

        assert_eq!(error.to_string(), "reading dictionary 'dict.json': No such file");
        assert!(!error.is_schema());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = TacticianError::from(io_error);

        match error {
            TacticianError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
