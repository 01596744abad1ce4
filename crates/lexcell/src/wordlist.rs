//! Wordlist datasets and spreadsheet cell records.
//!
//! A [`Wordlist`] holds the forms, cognate sets and cognate judgements of
//! one dataset and is read from and written to JSON. [`SheetCell`] is one
//! spreadsheet cell handed to the cell parser, [`ParsedCell`] what came of it.

use log::debug;
use serde::{Deserialize, Serialize};

use lexcell_core::{CognateJudgement, CognateSet, Form};
use lexcell_parser::{CellError, Diagnostic, ParseError, ParsedFormEntry};

use crate::LexcellError;

/// Forms, cognate sets and judgements of one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wordlist {
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub cognatesets: Vec<CognateSet>,
    #[serde(default)]
    pub judgements: Vec<CognateJudgement>,
}

impl Wordlist {
    /// Read a wordlist from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LexcellError::Json`] if the text is not a valid wordlist.
    pub fn from_json(text: &str) -> Result<Self, LexcellError> {
        let wordlist: Self = serde_json::from_str(text)?;
        debug!(
            forms = wordlist.forms.len(),
            cognatesets = wordlist.cognatesets.len(),
            judgements = wordlist.judgements.len();
            "Wordlist loaded"
        );
        Ok(wordlist)
    }

    /// Write the wordlist as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LexcellError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LexcellError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The form with the given id.
    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.iter().find(|form| form.id == id)
    }

    /// All judgements referring to the given form.
    pub fn judgements_for<'a>(
        &'a self,
        form_id: &'a str,
    ) -> impl Iterator<Item = &'a CognateJudgement> + 'a {
        self.judgements
            .iter()
            .filter(move |judgement| judgement.form_id == form_id)
    }
}

/// One spreadsheet cell to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetCell {
    /// Where the cell lives, e.g. `Sheet1.B12`.
    pub coordinate: String,
    /// The language of the cell's column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SheetCell {
    pub fn new(coordinate: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            coordinate: coordinate.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// The outcome of parsing one [`SheetCell`].
///
/// Only the coordinate, forms and elision count are serialized; errors and
/// diagnostics are reported separately.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedCell {
    pub coordinate: String,
    pub forms: Vec<ParsedFormEntry>,
    /// Number of elements that were the elision marker.
    pub elided: usize,
    /// Elements that failed to parse.
    #[serde(skip)]
    pub errors: Vec<CellError>,
    /// Warnings and errors, with spans into [`ParsedCell::text`].
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
    /// The cleaned cell text.
    #[serde(skip)]
    pub text: String,
}

impl ParsedCell {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The parsed forms, or an error if any element failed.
    ///
    /// # Errors
    ///
    /// Returns [`LexcellError::Parse`] with every diagnostic of the cell.
    pub fn into_result(self) -> Result<Vec<ParsedFormEntry>, LexcellError> {
        if self.has_errors() {
            return Err(LexcellError::new_parse_error(
                ParseError::new(self.diagnostics),
                self.coordinate,
                self.text,
            ));
        }
        Ok(self.forms)
    }
}
