//! Error types for lexcell operations.
//!
//! This module provides the main error type [`LexcellError`] which wraps
//! the error conditions of a curation run.

use std::io;

use thiserror::Error;

use lexcell_parser::ParseError;

use crate::validate::ValidationReport;

/// The main error type for lexcell operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the diagnostics of one cell together with
/// its coordinate and text, so label spans can be rendered against the
/// cell. The `Validation`
/// variant carries the whole report of a failed check.
#[derive(Debug, Error)]
pub enum LexcellError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{coordinate}: {err}")]
    Parse {
        err: ParseError,
        coordinate: String,
        text: String,
    },

    #[error("Validation failed with {} error(s)", .0.error_count())]
    Validation(ValidationReport),
}

impl LexcellError {
    /// Create a new `Parse` error for the cell at `coordinate` whose text
    /// the diagnostics point into.
    pub fn new_parse_error(
        err: ParseError,
        coordinate: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::Parse {
            err,
            coordinate: coordinate.into(),
            text: text.into(),
        }
    }
}
