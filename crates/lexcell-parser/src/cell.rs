//! Lazy parsing of whole spreadsheet cells.
//!
//! [`CellParser::parse`] cleans the cell text, splits it into elements and
//! returns a [`CellForms`] iterator. Each call to `next` parses one element
//! and yields an [`ElementOutcome`]: a parsed form, an explicit elision, or a
//! recoverable failure. A failed element never stops the elements after it.
//!
//! # Example
//!
//! ```
//! use lexcell_parser::{CellParser, ElementOutcome, ParserConfig, RawCell};
//!
//! let parser = CellParser::new(ParserConfig::default());
//! let cell = RawCell::new("/ta/ [ta.'ʔa] ['ta] (cabello púbico){4}");
//!
//! let forms: Vec<_> = parser
//!     .parse(&cell, Some("abui"), "Sheet1.C4")
//!     .filter_map(ElementOutcome::into_form)
//!     .collect();
//!
//! assert_eq!(forms[0].phonemic.as_deref(), Some("ta"));
//! assert_eq!(forms[0].variants, vec!["['ta]"]);
//! ```

use std::{collections::BTreeSet, iter::FusedIterator};

use log::{debug, trace, warn};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::{
    config::{Field, ParserConfig},
    error::{CellError, CellErrorKind, Diagnostic, DiagnosticCollector, FieldError, ParseError},
    fields::FieldExtractor,
    separator::Splitter,
    source::{SourceRef, SourceResolver},
    span::Span,
    variant::{interior, scan_variants},
};

/// The two properties of a spreadsheet cell the parser reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    text: String,
    comment: Option<String>,
}

impl RawCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            comment: None,
        }
    }

    /// Attach the spreadsheet comment of the cell.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// One form described by one element of a cell.
///
/// Transcriptions hold the payload without delimiters. Variants keep their
/// marker and delimiters, e.g. `~[ʒi'tɨka]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFormEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonemic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthographic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub source: BTreeSet<SourceRef>,
    pub variants: Vec<String>,
    /// The element text this entry was parsed from.
    pub value: String,
    form: String,
}

impl ParsedFormEntry {
    /// The first transcription present, in configured priority order.
    pub fn form(&self) -> &str {
        &self.form
    }

    /// The value of a transcription field.
    pub fn transcription(&self, field: Field) -> Option<&str> {
        match field {
            Field::Phonemic => self.phonemic.as_deref(),
            Field::Phonetic => self.phonetic.as_deref(),
            Field::Orthographic => self.orthographic.as_deref(),
            Field::Comment | Field::Source => None,
        }
    }

    fn set_transcription(&mut self, field: Field, value: String) {
        match field {
            Field::Phonemic => self.phonemic = Some(value),
            Field::Phonetic => self.phonetic = Some(value),
            Field::Orthographic => self.orthographic = Some(value),
            Field::Comment | Field::Source => {}
        }
    }

    fn append_comment(&mut self, comment: &str, separator: &str) {
        let comment = comment.trim();
        if comment.is_empty() {
            return;
        }
        self.comment = Some(match self.comment.take() {
            Some(existing) => format!("{existing}{separator}{comment}"),
            None => comment.to_string(),
        });
    }
}

/// What became of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementOutcome {
    Form(ParsedFormEntry),
    /// The element was the elision marker: no form, and no error.
    Elided,
    /// The element could not be parsed and was skipped.
    Failed(CellError),
}

impl ElementOutcome {
    pub fn is_form(&self) -> bool {
        matches!(self, ElementOutcome::Form(_))
    }

    pub fn into_form(self) -> Option<ParsedFormEntry> {
        match self {
            ElementOutcome::Form(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CellError> {
        match self {
            ElementOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Normalise cell text before splitting.
///
/// Composes to NFC, trims every line and joins the non-empty lines with
/// `;\t`, so a line break separates forms like a semicolon does.
pub fn clean_cell_value(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(";\t")
}

/// Parses cells written in one dataset's conventions.
#[derive(Debug, Clone, Default)]
pub struct CellParser {
    config: ParserConfig,
}

impl CellParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Start parsing `cell`.
    ///
    /// `language_id` namespaces source keys; `coordinate` locates the cell
    /// in log messages and errors. Nothing is parsed until the returned
    /// iterator is advanced.
    pub fn parse<'p>(
        &'p self,
        cell: &RawCell,
        language_id: Option<&str>,
        coordinate: &str,
    ) -> CellForms<'p> {
        let text = clean_cell_value(cell.text());
        trace!(coordinate, text = text.as_str(); "Parsing cell");

        let (elements, failure) = match Splitter::new(&self.config).split_spans(&text) {
            Ok(elements) => (elements, None),
            Err(err) => {
                let failure = FieldError::new(
                    CellErrorKind::BracketMismatch {
                        delimiter: err.delimiter(),
                    },
                    err.span(),
                )
                .at(coordinate, &text);
                (Vec::new(), Some(failure))
            }
        };

        CellForms {
            parser: self,
            text,
            elements: elements.into_iter(),
            failure,
            coordinate: coordinate.to_string(),
            language_id: language_id.map(str::to_string),
            cell_comment: cell.comment().map(str::to_string),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Parse a single element.
    ///
    /// Returns `Ok(None)` for the elision marker. Warnings are appended to
    /// `warnings` with spans into `element`.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] with a span into `element` if the element
    /// cannot be parsed.
    pub fn parse_element(
        &self,
        element: &str,
        language_id: Option<&str>,
        warnings: &mut Vec<Diagnostic>,
    ) -> Result<Option<ParsedFormEntry>, FieldError> {
        let element = element.trim();
        let elision = self.config.elision();
        if !elision.is_empty() && element == elision {
            return Ok(None);
        }

        let fields = FieldExtractor::new(&self.config).extract(element)?;
        let (transcriptions, extra_variants, comments, sources, field_warnings) =
            fields.into_parts();
        warnings.extend(field_warnings);

        let mut entry = ParsedFormEntry {
            value: element.to_string(),
            ..ParsedFormEntry::default()
        };
        let mut variants = Vec::new();

        for capture in &transcriptions {
            let Some(spec) = self.config.spec_for(capture.field()) else {
                continue;
            };
            let (open, close) = (spec.open(), spec.close());
            self.check_inline_separators(interior(capture.raw(), open, close), capture.span())?;

            let scanned =
                scan_variants(capture.raw(), self.config.variant_markers(), open, close);
            variants.extend(scanned.variants);
            if !scanned.canonical.trim().is_empty() {
                entry.set_transcription(capture.field(), scanned.canonical);
            }
        }
        variants.extend(extra_variants);

        entry.form = match self
            .config
            .transcriptions()
            .find_map(|field| entry.transcription(field))
        {
            Some(form) => form.to_string(),
            None => {
                return Err(FieldError::new(
                    CellErrorKind::NoTranscription,
                    Span::new(0..element.len()),
                ));
            }
        };

        let resolver = SourceResolver::new(&self.config);
        for capture in &sources {
            let resolved = resolver.resolve(capture.raw(), language_id);
            if let Some(warning) = resolved.warning {
                warnings.push(warning.with_label(capture.span(), "source not closed"));
            }
            entry.source.extend(resolved.source);
        }
        if entry.source.is_empty() {
            entry.source.extend(resolver.default_source(language_id));
        }

        let separator = self.config.comment_separator();
        if self.config.variants_in_comment() {
            for variant in variants.drain(..) {
                entry.append_comment(&variant, separator);
            }
        }
        for comment in &comments {
            entry.append_comment(comment, separator);
        }
        entry.variants = variants;

        Ok(Some(entry))
    }

    /// A transcription may hold variants or several readings, not both.
    fn check_inline_separators(&self, interior: &str, span: Span) -> Result<(), FieldError> {
        let has_marker = interior
            .chars()
            .any(|c| self.config.variant_markers().contains(&c));
        if !has_marker {
            return Ok(());
        }
        match interior
            .chars()
            .find(|c| self.config.separators().contains(c))
        {
            Some(separator) => Err(FieldError::new(
                CellErrorKind::IllegalSeparator { separator },
                span,
            )),
            None => Ok(()),
        }
    }
}

/// Iterator over the elements of one cell.
///
/// Finite and single-pass. Warnings and errors are logged with the cell
/// coordinate as they occur and collected; label spans of collected
/// diagnostics point into [`CellForms::text`].
#[derive(Debug)]
pub struct CellForms<'p> {
    parser: &'p CellParser,
    text: String,
    elements: std::vec::IntoIter<Span>,
    failure: Option<CellError>,
    coordinate: String,
    language_id: Option<String>,
    cell_comment: Option<String>,
    diagnostics: DiagnosticCollector,
}

impl CellForms<'_> {
    /// The cleaned cell text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }

    /// Diagnostics collected from the elements parsed so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    /// Drain the remaining elements and report whether any failed.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] holding every diagnostic if an element
    /// failed to parse.
    pub fn finish(mut self) -> Result<(), ParseError> {
        for _ in self.by_ref() {}
        self.diagnostics.finish()
    }

    fn fail(&mut self, err: CellError, offset: usize) -> ElementOutcome {
        warn!(coordinate = self.coordinate.as_str(), element = err.element(); "{err}");
        self.diagnostics.emit(err.to_diagnostic().shifted(offset));
        ElementOutcome::Failed(err)
    }

    fn parse_next(&mut self, span: Span) -> ElementOutcome {
        let element = &self.text[span.range()];
        let mut warnings = Vec::new();
        let result = self
            .parser
            .parse_element(element, self.language_id.as_deref(), &mut warnings);

        for warning in warnings {
            warn!(coordinate = self.coordinate.as_str(), element; "{warning}");
            self.diagnostics.emit(warning.shifted(span.start()));
        }

        match result {
            Ok(Some(mut entry)) => {
                if let Some(comment) = &self.cell_comment {
                    entry.append_comment(comment, self.parser.config.comment_separator());
                }
                ElementOutcome::Form(entry)
            }
            Ok(None) => {
                debug!(coordinate = self.coordinate.as_str(); "Element elided");
                ElementOutcome::Elided
            }
            Err(err) => {
                let err = err.at(&self.coordinate, element);
                self.fail(err, span.start())
            }
        }
    }
}

impl Iterator for CellForms<'_> {
    type Item = ElementOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.failure.take() {
            return Some(self.fail(err, 0));
        }
        let span = self.elements.next()?;
        Some(self.parse_next(span))
    }
}

impl FusedIterator for CellForms<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cell_value() {
        assert_eq!(clean_cell_value("  [a]\n[b] \n\n"), "[a];\t[b]");
        assert_eq!(clean_cell_value("e\u{301}"), "\u{e9}");
        assert_eq!(clean_cell_value("   "), "");
    }

    #[test]
    fn test_empty_cell_yields_nothing() {
        let parser = CellParser::default();
        let mut forms = parser.parse(&RawCell::new("  \n "), None, "A1");
        assert!(forms.next().is_none());
        assert!(forms.next().is_none());
    }

    #[test]
    fn test_parse_element_elision() {
        let parser = CellParser::default();
        let mut warnings = Vec::new();
        assert_eq!(parser.parse_element("...", None, &mut warnings), Ok(None));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_element_without_transcription() {
        let parser = CellParser::default();
        let mut warnings = Vec::new();
        let err = parser
            .parse_element("(only a comment){2}", None, &mut warnings)
            .unwrap_err();
        assert_eq!(err.kind, CellErrorKind::NoTranscription);
    }

    #[test]
    fn test_parse_element_inline_variant_and_separator() {
        let parser = CellParser::default();
        let mut warnings = Vec::new();
        let err = parser
            .parse_element("/a ~ b, c/", None, &mut warnings)
            .unwrap_err();
        assert_eq!(err.kind, CellErrorKind::IllegalSeparator { separator: ',' });
        assert_eq!(err.span, Span::new(0..10));
    }

    #[test]
    fn test_form_follows_priority() {
        let parser = CellParser::default();
        let mut warnings = Vec::new();
        let entry = parser
            .parse_element("<kwa> [kʷa]", None, &mut warnings)
            .unwrap()
            .unwrap();
        assert_eq!(entry.form(), "kʷa");
        assert_eq!(entry.transcription(Field::Orthographic), Some("kwa"));
    }

    #[test]
    fn test_default_source_without_language() {
        let parser = CellParser::default();
        let mut warnings = Vec::new();
        let entry = parser
            .parse_element("[a]", None, &mut warnings)
            .unwrap()
            .unwrap();
        assert_eq!(
            entry.source.iter().map(|s| s.id()).collect::<Vec<_>>(),
            vec!["1"]
        );
    }

    #[test]
    fn test_no_default_source() {
        let parser = CellParser::new(ParserConfig::default().with_default_source(None));
        let mut warnings = Vec::new();
        let entry = parser
            .parse_element("[a]", Some("abui"), &mut warnings)
            .unwrap()
            .unwrap();
        assert!(entry.source.is_empty());
    }

    #[test]
    fn test_cell_comment_appended_to_every_form() {
        let parser = CellParser::default();
        let cell = RawCell::new("[a] (x), [b]").with_comment("checked 2019");
        let comments: Vec<_> = parser
            .parse(&cell, None, "B2")
            .filter_map(ElementOutcome::into_form)
            .map(|entry| entry.comment)
            .collect();
        assert_eq!(
            comments,
            vec![
                Some("x\tchecked 2019".to_string()),
                Some("checked 2019".to_string())
            ]
        );
    }

    #[test]
    fn test_warning_spans_point_into_cell_text() {
        let parser = CellParser::default();
        let mut forms = parser.parse(&RawCell::new("[b], /a/ /b/"), None, "C3");
        while forms.next().is_some() {}

        let warning = &forms.diagnostics()[0];
        let span = warning.labels()[0].span();
        assert_eq!(&forms.text()[span.range()], "/b/");
    }
}
