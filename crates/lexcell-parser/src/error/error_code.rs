//! Error codes for the lexcell diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Cell splitting errors
//! - `E1xx` - Element field extraction errors and warnings
//! - `E2xx` - Cognate judgement validation findings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    // =========================================================================
    // Splitting Errors (E0xx)
    // =========================================================================
    /// Mismatched delimiters.
    ///
    /// A bracket was never closed, or a closing bracket appeared that does
    /// not match the innermost open bracket.
    E001,

    // =========================================================================
    // Extraction Errors (E1xx)
    // =========================================================================
    /// Illegal separator.
    ///
    /// A hard separator or variant marker appeared outside any transcription.
    E100,

    /// Unparsable residue.
    ///
    /// Text left after removing all known fields contains reserved characters.
    E101,

    /// Empty element.
    ///
    /// The element holds nothing but whitespace.
    E102,

    /// Unexpected variant.
    ///
    /// A transcription field appeared a second time without a variant
    /// marker, or a variant marker had no earlier field of its kind.
    E103,

    /// No transcription.
    ///
    /// The element holds comments or sources but no transcription.
    E104,

    /// Transcription delimiter in comment.
    ///
    /// A comment contains unescaped delimiters of a transcription field.
    E105,

    /// Unclosed source.
    ///
    /// A source reference lacks its closing delimiter, so the split into
    /// source and context is a guess.
    E106,

    // =========================================================================
    // Validation Findings (E2xx)
    // =========================================================================
    /// Segment slice out of bounds.
    E200,

    /// Overlapping judgements.
    ///
    /// A segment is claimed by more than one judgement of a form.
    E201,

    /// Non-consecutive slice.
    ///
    /// A judgement covers segments that are not adjacent.
    E202,

    /// Alignment does not match segments.
    ///
    /// Without gaps, the alignment differs from the referenced segments.
    E203,

    /// Alignment length mismatch.
    ///
    /// Alignments within one cognate set have different lengths.
    E204,

    /// Unknown form.
    ///
    /// A judgement references a form that does not exist.
    E205,

    /// Malformed segment slice.
    E206,

    /// Uncovered segments.
    ///
    /// Some segments of a form belong to no cognate set.
    E207,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Splitting errors
            ErrorCode::E001 => "E001",
            // Extraction errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            // Validation findings
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Splitting errors
            ErrorCode::E001 => "mismatched delimiters",
            // Extraction errors
            ErrorCode::E100 => "illegal separator",
            ErrorCode::E101 => "unparsable residue",
            ErrorCode::E102 => "empty element",
            ErrorCode::E103 => "unexpected variant",
            ErrorCode::E104 => "no transcription",
            ErrorCode::E105 => "transcription delimiter in comment",
            ErrorCode::E106 => "unclosed source",
            // Validation findings
            ErrorCode::E200 => "segment slice out of bounds",
            ErrorCode::E201 => "overlapping judgements",
            ErrorCode::E202 => "non-consecutive slice",
            ErrorCode::E203 => "alignment does not match segments",
            ErrorCode::E204 => "alignment length mismatch",
            ErrorCode::E205 => "unknown form",
            ErrorCode::E206 => "malformed segment slice",
            ErrorCode::E207 => "uncovered segments",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
