//! Structured errors for elements that could not be parsed.

use thiserror::Error;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// The kinds of parse failure for a single element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellErrorKind {
    #[error("mismatched delimiter `{delimiter}`")]
    BracketMismatch { delimiter: char },

    #[error("separator `{separator}` outside any transcription")]
    IllegalSeparator { separator: char },

    #[error("could not parse `{residue}`")]
    UnparsableResidue { residue: String },

    #[error("element is empty")]
    EmptyElement,

    #[error("element has no transcription")]
    NoTranscription,
}

impl CellErrorKind {
    /// The diagnostic code for this kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            CellErrorKind::BracketMismatch { .. } => ErrorCode::E001,
            CellErrorKind::IllegalSeparator { .. } => ErrorCode::E100,
            CellErrorKind::UnparsableResidue { .. } => ErrorCode::E101,
            CellErrorKind::EmptyElement => ErrorCode::E102,
            CellErrorKind::NoTranscription => ErrorCode::E104,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CellErrorKind::BracketMismatch { .. } => "delimiter does not match",
            CellErrorKind::IllegalSeparator { .. } => "reserved separator",
            CellErrorKind::UnparsableResidue { .. } => "not part of any field",
            CellErrorKind::EmptyElement => "nothing here",
            CellErrorKind::NoTranscription => "no transcription in this element",
        }
    }

    fn help(&self) -> Option<&'static str> {
        match self {
            CellErrorKind::BracketMismatch { .. } => {
                Some("close every bracket, or escape a literal delimiter with `!`")
            }
            CellErrorKind::IllegalSeparator { .. } => {
                Some("put variants inside the transcription brackets, e.g. `/a ~ b/`")
            }
            CellErrorKind::UnparsableResidue { .. } => {
                Some("wrap free text in `(` `)` to keep it as a comment")
            }
            CellErrorKind::EmptyElement => None,
            CellErrorKind::NoTranscription => {
                Some("use `...` to state that a form is deliberately missing")
            }
        }
    }
}

/// A parse failure located inside one element, before the caller's cell
/// coordinate is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct FieldError {
    pub kind: CellErrorKind,
    /// Byte span into the element text.
    pub span: Span,
}

impl FieldError {
    pub fn new(kind: CellErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Attach the cell coordinate and the element text.
    pub fn at(self, coordinate: &str, element: &str) -> CellError {
        CellError {
            kind: self.kind,
            coordinate: coordinate.to_string(),
            element: element.to_string(),
            span: self.span,
        }
    }
}

/// An element of a cell that could not be parsed.
///
/// The span points into [`CellError::element`]. The error is recoverable:
/// the element is dropped and parsing continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{located}in `{element}`: {kind}", located = coordinate_prefix(.coordinate))]
pub struct CellError {
    kind: CellErrorKind,
    coordinate: String,
    element: String,
    span: Span,
}

impl CellError {
    pub fn kind(&self) -> &CellErrorKind {
        &self.kind
    }

    /// The caller-supplied cell coordinate, e.g. `Sheet1.B12`.
    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }

    /// The raw element text.
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Convert into a [`Diagnostic`] whose label points into the element.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string())
            .with_code(self.kind.code())
            .with_label(self.span, self.kind.label());
        match self.kind.help() {
            Some(help) => diagnostic.with_help(help),
            None => diagnostic,
        }
    }
}

fn coordinate_prefix(coordinate: &str) -> String {
    if coordinate.is_empty() {
        String::new()
    } else {
        format!("{coordinate}: ")
    }
}
