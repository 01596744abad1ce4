//! Rendering of lexcell errors with miette.
//!
//! Cell diagnostics are shown against the cell text and named by the cell's
//! coordinate, so a report reads like a snippet of the spreadsheet.
//! Validation findings have no text to point into; they are rendered with
//! the form and cognate set they concern and a hint for their kind.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceSpan};

use lexcell::{
    LexcellError, ParsedCell,
    validate::{Finding, FindingKind, ValidationReport},
};
use lexcell_parser::{Diagnostic, Span, error::Severity};

/// A diagnostic of one spreadsheet cell, with the cell as its source.
#[derive(Debug)]
pub struct CellDiagnostic<'a> {
    diag: &'a Diagnostic,
    cell: NamedSource<String>,
}

impl<'a> CellDiagnostic<'a> {
    /// Create a diagnostic for the cell at `coordinate` holding `text`.
    pub fn new(diag: &'a Diagnostic, coordinate: &str, text: &str) -> Self {
        let name = if coordinate.is_empty() {
            "cell"
        } else {
            coordinate
        };
        Self {
            diag,
            cell: NamedSource::new(name, text.to_string()),
        }
    }
}

impl fmt::Display for CellDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for CellDiagnostic<'_> {}

impl MietteDiagnostic for CellDiagnostic<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.diag
            .code()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette_severity(self.diag.severity()))
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.diag
            .help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.cell)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// One validation [`Finding`], with a hint on how to resolve it.
#[derive(Debug)]
pub struct FindingReport<'a>(pub &'a Finding);

impl FindingReport<'_> {
    fn context(&self) -> Option<String> {
        let finding = self.0;
        let mut parts = Vec::new();
        if let Some(form) = finding.form_id() {
            parts.push(format!("form `{form}`"));
        }
        if let Some(cognateset) = finding.cognateset_id() {
            parts.push(format!("cognate set `{cognateset}`"));
        }
        if !finding.judgement_ids().is_empty() {
            parts.push(format!("judgements {}", finding.judgement_ids().join(", ")));
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl fmt::Display for FindingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.message())
    }
}

impl std::error::Error for FindingReport<'_> {}

impl MietteDiagnostic for FindingReport<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        Some(Box::new(self.0.kind().code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette_severity(self.0.severity()))
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let hint = finding_hint(self.0.kind());
        let help = match self.context() {
            Some(context) => format!("{hint}\nconcerns {context}"),
            None => hint.to_string(),
        };
        Some(Box::new(help))
    }
}

/// An error of a curation run that points at no cell or finding.
#[derive(Debug)]
pub struct ErrorReport<'a>(pub &'a LexcellError);

impl fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorReport<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorReport<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let code = match &self.0 {
            LexcellError::Io(_) => "lexcell::io",
            LexcellError::Config(_) => "lexcell::config",
            LexcellError::Json(_) => "lexcell::json",
            LexcellError::Parse { .. } => "lexcell::parse",
            LexcellError::Validation(_) => "lexcell::validation",
        };
        Some(Box::new(code))
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let help = match &self.0 {
            LexcellError::Config(_) => "check the file given with `--config`",
            LexcellError::Json(_) => {
                "cells are a JSON list of `{coordinate, text}` objects; wordlists hold `forms`, `cognatesets` and `judgements`"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// Anything the CLI renders with miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A diagnostic pointing into a cell.
    Cell(CellDiagnostic<'a>),
    /// A validation finding.
    Finding(FindingReport<'a>),
    /// An error without a location.
    Error(ErrorReport<'a>),
}

impl<'a> Reportable<'a> {
    fn inner(&self) -> &(dyn MietteDiagnostic + 'a) {
        match self {
            Reportable::Cell(cell) => cell,
            Reportable::Finding(finding) => finding,
            Reportable::Error(err) => err,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner().source()
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.inner().code()
    }

    fn severity(&self) -> Option<miette::Severity> {
        self.inner().severity()
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.inner().help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.inner().source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.inner().labels()
    }
}

fn miette_severity(severity: Severity) -> miette::Severity {
    match severity {
        Severity::Error => miette::Severity::Error,
        Severity::Warning => miette::Severity::Warning,
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

fn finding_hint(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::UnknownForm => "add the form to the wordlist, or fix the judgement's form id",
        FindingKind::MalformedSlice => "write slices as 1-based `start:end` tokens, e.g. `1:3`",
        FindingKind::SliceOutOfBounds => {
            "ends are exclusive: a form with n segments is covered by `1:<n+1>`"
        }
        FindingKind::Overlap => {
            "split the segments between the cognate sets, or allow non-concatenative morphemes in the configuration"
        }
        FindingKind::NonConsecutive => "check that the discontinuous morpheme is intended",
        FindingKind::AlignmentMismatch => "realign the judgement, or fix its segment slice",
        FindingKind::AlignmentLength => "realign the cognate set so all its alignments agree",
        FindingKind::Uncovered => "run `lexcell singletons` to cover the remaining segments",
    }
}

/// Convert a [`LexcellError`] into a list of reportable errors.
///
/// A parse error yields one [`Reportable`] per diagnostic of the cell, a
/// failed validation one per error finding, and anything else a single
/// [`Reportable`].
pub fn to_reportables(err: &LexcellError) -> Vec<Reportable<'_>> {
    match err {
        LexcellError::Parse {
            err: parse_err,
            coordinate,
            text,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::Cell(CellDiagnostic::new(diag, coordinate, text)))
            .collect(),
        LexcellError::Validation(report) => report
            .errors()
            .map(|finding| Reportable::Finding(FindingReport(finding)))
            .collect(),
        _ => vec![Reportable::Error(ErrorReport(err))],
    }
}

/// Every diagnostic of a parsed cell, rendered against the cell text.
pub fn cell_reportables(cell: &ParsedCell) -> Vec<Reportable<'_>> {
    cell.diagnostics
        .iter()
        .map(|diag| Reportable::Cell(CellDiagnostic::new(diag, &cell.coordinate, &cell.text)))
        .collect()
}

/// The warnings of a validation run.
pub fn warning_reportables(report: &ValidationReport) -> Vec<Reportable<'_>> {
    report
        .warnings()
        .map(|finding| Reportable::Finding(FindingReport(finding)))
        .collect()
}

#[cfg(test)]
mod tests {
    use lexcell::{
        CognateJudgement, Curator, Form, SheetCell, Wordlist, config::ValidationPolicy,
        validate::Validator,
    };
    use lexcell_parser::{ParseError, error::ErrorCode};

    use super::*;

    fn wordlist(judgements: Vec<CognateJudgement>) -> Wordlist {
        Wordlist {
            forms: vec![Form::new("f1", &["a", "b", "c"]).with_form("abc")],
            cognatesets: Vec::new(),
            judgements,
        }
    }

    fn judgement(id: &str, set: &str, tokens: &[&str]) -> CognateJudgement {
        let mut judgement = CognateJudgement::new(id, "f1", set);
        judgement.segment_slice = tokens.iter().map(|t| t.to_string()).collect();
        judgement
    }

    #[test]
    fn test_cell_diagnostic_is_named_by_coordinate() {
        let diag = Diagnostic::error("mismatched delimiter `]`")
            .with_code(ErrorCode::E001)
            .with_label(Span::new(13..14), "delimiter does not match")
            .with_help("close every bracket");
        let err = LexcellError::new_parse_error(
            ParseError::from(diag),
            "Sheet1.C4",
            "(GIVE BIRTH) [mbohaˈpɨ",
        );

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "mismatched delimiter `]`");
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()),
            Some("E001".to_string())
        );

        let source = reportables[0].source_code().expect("Expected the cell text");
        let contents = source
            .read_span(&(13..14).into(), 0, 0)
            .expect("Span should lie inside the cell");
        assert_eq!(contents.name(), Some("Sheet1.C4"));
    }

    #[test]
    fn test_every_cell_diagnostic_is_reported() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::warning("second warning")
                .with_code(ErrorCode::E103)
                .with_label(Span::new(10..15), "second"),
        ];
        let err = LexcellError::new_parse_error(ParseError::from(diags), "", "cell text goes here");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[1].to_string(), "second warning");
        assert_eq!(reportables[1].severity(), Some(miette::Severity::Warning));
    }

    #[test]
    fn test_plain_error_carries_code_and_help() {
        let err = LexcellError::Config("bad separator".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        let Reportable::Error(report) = &reportables[0] else {
            panic!("Expected Error");
        };
        assert_eq!(report.to_string(), "Configuration error: bad separator");
        assert_eq!(
            report.code().map(|c| c.to_string()),
            Some("lexcell::config".to_string())
        );
        assert!(report.help().is_some());
    }

    #[test]
    fn test_validation_error_reports_each_error_finding() {
        let wordlist = wordlist(vec![
            judgement("j1", "c1", &["4:3"]),
            judgement("j2", "c2", &["1:2", "3:4"]),
        ]);
        let policy = ValidationPolicy::default().with_strict(true);
        let report = Validator::new(&policy).validate(&wordlist);
        assert_eq!(report.findings().len(), 2);

        let err = LexcellError::Validation(report);
        let reportables = to_reportables(&err);

        // The discontinuity warning is not reported as an error.
        assert_eq!(reportables.len(), 1);
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()),
            Some("E200".to_string())
        );
        let help = reportables[0].help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("form `f1`, cognate set `c1`, judgements j1"));
        assert!(reportables[0].source_code().is_none());
    }

    #[test]
    fn test_warning_reportables() {
        let wordlist = wordlist(vec![judgement("j1", "c1", &["1:2", "3:4"])]);
        let policy = ValidationPolicy::default().with_strict(true);
        let report = Validator::new(&policy).validate(&wordlist);

        let warnings = warning_reportables(&report);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity(), Some(miette::Severity::Warning));
        assert_eq!(
            warnings[0].code().map(|c| c.to_string()),
            Some("E202".to_string())
        );
    }

    #[test]
    fn test_cell_reportables_point_into_cell_text() {
        let cell = SheetCell::new("Sheet1.A1", "/a/ [b] /c/, [d");
        let parsed = Curator::default().parse_cell(&cell);

        let reportables = cell_reportables(&parsed);
        assert!(!reportables.is_empty());
        for reportable in &reportables {
            let labels: Vec<_> = reportable.labels().into_iter().flatten().collect();
            for label in labels {
                assert!(label.offset() + label.len() <= parsed.text.len());
            }
        }
    }

    #[test]
    fn test_primary_and_secondary_labels() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary label")
            .with_secondary_label(Span::new(10..15), "secondary label");

        let adapter = CellDiagnostic::new(&diag, "A1", "some cell content");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary label"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }
}
