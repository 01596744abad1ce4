//! Error and diagnostic system for the lexcell parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans pointing into cell text
//! - Severity levels
//! - Diagnostic collector for accumulating warnings and errors per cell
//! - [`CellError`], the structured error for one element that failed to parse
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, labeled
//! spans, and help text. Multiple diagnostics are wrapped in [`ParseError`].
//! Parse failures of individual elements are [`CellError`] values that the
//! cell parser reports and skips.
//!
//! # Example
//!
//! ```
//! # use lexcell_parser::error::{Diagnostic, ErrorCode};
//! # use lexcell_parser::Span;
//!
//! let diag = Diagnostic::warning("element `['ta]` was an unexpected variant for phonetic")
//!     .with_code(ErrorCode::E103)
//!     .with_label(Span::new(15..20), "repeated phonetic transcription")
//!     .with_help("mark intended variants with `~` or `%`");
//! ```

mod cell_error;
mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use cell_error::{CellError, CellErrorKind, FieldError};
pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
