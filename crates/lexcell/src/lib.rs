//! Lexcell - curation of lexical spreadsheets.
//!
//! Parsing of transcription cells into structured form records, validation
//! of cognate judgements and their segment slices, detection of segments
//! claimed by several cognate sets, and completion of a dataset with
//! singleton cognate sets.

pub mod config;
pub mod overlap;
pub mod singleton;
pub mod validate;
pub mod wordlist;

mod error;

pub use lexcell_core::{
    Alignment, CognateJudgement, CognateSet, Form, SegmentSlice, SliceError, identifier,
};
pub use lexcell_parser::{ElementOutcome, ParsedFormEntry, RawCell};

pub use error::LexcellError;
pub use wordlist::{ParsedCell, SheetCell, Wordlist};

use log::{debug, info, trace};

use lexcell_parser::CellParser;

use config::AppConfig;
use singleton::{SingletonBuilder, Singletons};
use validate::{ValidationReport, Validator};

/// Entry point for curating a lexical dataset.
///
/// A `Curator` bundles the configuration of one run and exposes the parsing,
/// validation and completion stages.
///
/// # Examples
///
/// ```
/// use lexcell::{Curator, SheetCell, config::AppConfig};
///
/// let curator = Curator::new(AppConfig::default());
/// let cell = SheetCell::new("Sheet1.B2", "/ta/ [ta.'ʔa] (cabello púbico){4}")
///     .with_language("maweti");
///
/// let parsed = curator.parse_cell(&cell);
/// assert!(!parsed.has_errors());
/// assert_eq!(parsed.forms[0].phonemic.as_deref(), Some("ta"));
/// ```
#[derive(Debug, Default)]
pub struct Curator {
    config: AppConfig,
    parser: CellParser,
}

impl Curator {
    /// Create a new curator with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let parser = CellParser::new(config.parser().clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse one spreadsheet cell into form records.
    ///
    /// Failing elements do not stop the cell; they are collected in
    /// [`ParsedCell::errors`] next to the forms of the other elements.
    pub fn parse_cell(&self, cell: &SheetCell) -> ParsedCell {
        let mut raw = RawCell::new(cell.text.as_str());
        if let Some(comment) = &cell.comment {
            raw = raw.with_comment(comment.as_str());
        }

        let mut outcomes = self
            .parser
            .parse(&raw, cell.language_id.as_deref(), &cell.coordinate);

        let mut forms = Vec::new();
        let mut elided = 0;
        let mut errors = Vec::new();
        for outcome in outcomes.by_ref() {
            match outcome {
                ElementOutcome::Form(entry) => forms.push(entry),
                ElementOutcome::Elided => elided += 1,
                ElementOutcome::Failed(err) => errors.push(err),
            }
        }

        trace!(coordinate = cell.coordinate.as_str(), forms:? = forms; "Cell parsed");
        ParsedCell {
            coordinate: cell.coordinate.clone(),
            forms,
            elided,
            errors,
            diagnostics: outcomes.diagnostics().to_vec(),
            text: outcomes.text().to_string(),
        }
    }

    /// Parse every cell of a sheet, in order.
    pub fn parse_sheet(&self, cells: &[SheetCell]) -> Vec<ParsedCell> {
        info!(cells = cells.len(); "Parsing sheet");
        let parsed: Vec<ParsedCell> = cells.iter().map(|cell| self.parse_cell(cell)).collect();

        let failed = parsed.iter().filter(|cell| cell.has_errors()).count();
        info!(
            forms = parsed.iter().map(|cell| cell.forms.len()).sum::<usize>(),
            failed_cells = failed;
            "Sheet parsed"
        );
        parsed
    }

    /// Validate the cognate judgements of `wordlist` and report all findings.
    pub fn validate(&self, wordlist: &Wordlist) -> ValidationReport {
        Validator::new(self.config.validation()).validate(wordlist)
    }

    /// Validate `wordlist` and fail if any finding is an error.
    ///
    /// # Errors
    ///
    /// Returns [`LexcellError::Validation`] carrying the full report if it
    /// contains errors.
    pub fn check(&self, wordlist: &Wordlist) -> Result<ValidationReport, LexcellError> {
        let report = self.validate(wordlist);
        if report.has_errors() {
            return Err(LexcellError::Validation(report));
        }
        debug!(warnings = report.warnings().count(); "Wordlist passed validation");
        Ok(report)
    }

    /// The singleton cognate sets `wordlist` is missing.
    pub fn singletons(&self, wordlist: &Wordlist) -> Singletons {
        SingletonBuilder::new(self.config.singletons()).build(wordlist)
    }

    /// Add singleton cognate sets to `wordlist`, returning how many were added.
    pub fn complete_singletons(&self, wordlist: &mut Wordlist) -> usize {
        let singletons = self.singletons(wordlist);
        let created = singletons.len();
        singletons.apply_to(wordlist);
        created
    }

    /// Clusters of cognate sets that share segments within forms.
    pub fn overlap_clusters(&self, wordlist: &Wordlist) -> Vec<Vec<String>> {
        let map = overlap::segment_cognatesets(wordlist);
        let candidates = overlap::merge_candidates(&map, wordlist);
        overlap::cluster(&candidates)
    }
}
