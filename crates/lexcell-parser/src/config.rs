//! Configuration of the cell conventions a dataset uses.
//!
//! Every dataset writes its cells a little differently. [`ParserConfig`]
//! captures the delimiter semantics, separators and markers, and can be
//! loaded from the `[parser]` section of a TOML configuration file.
//!
//! # Example
//!
//! ```
//! # use lexcell_parser::{Field, ParserConfig};
//! let config = ParserConfig::default();
//! assert_eq!(config.field_for_open('/').map(|spec| spec.field()), Some(Field::Phonemic));
//! assert_eq!(config.default_source(), Some("1"));
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The record fields a bracketed group can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Phonemic,
    Phonetic,
    Orthographic,
    Comment,
    Source,
}

impl Field {
    /// Transcription fields are captured once per element; the others repeat.
    pub fn is_transcription(&self) -> bool {
        matches!(
            self,
            Field::Phonemic | Field::Phonetic | Field::Orthographic
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Phonemic => "phonemic",
            Field::Phonetic => "phonetic",
            Field::Orthographic => "orthographic",
            Field::Comment => "comment",
            Field::Source => "source",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One delimiter pair and the field it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    open: char,
    close: char,
    field: Field,
}

impl FieldSpec {
    pub fn new(open: char, close: char, field: Field) -> Self {
        Self { open, close, field }
    }

    pub fn open(&self) -> char {
        self.open
    }

    pub fn close(&self) -> char {
        self.close
    }

    pub fn field(&self) -> Field {
        self.field
    }
}

/// Cell conventions for one dataset.
///
/// Transcription fields are listed in priority order: the first one present
/// in an element becomes its derived form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter semantics, in priority order.
    fields: Vec<FieldSpec>,

    /// Characters separating the forms of one cell.
    separators: Vec<char>,

    /// Characters introducing a variant reading.
    variant_markers: Vec<char>,

    /// Character making the following delimiter literal.
    escape: Option<char>,

    /// Literal stating that a form is deliberately missing.
    elision: String,

    /// Source key used when an element cites no source.
    default_source: Option<String>,

    /// Split on a separator only if a field opener follows it.
    require_field_after_separator: bool,

    /// Transcription field receiving undelimited text, if any.
    bare_text_field: Option<Field>,

    /// Fold variants into the comment instead of listing them.
    variants_in_comment: bool,

    /// Separator joining multiple comments.
    comment_separator: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldSpec::new('/', '/', Field::Phonemic),
                FieldSpec::new('[', ']', Field::Phonetic),
                FieldSpec::new('<', '>', Field::Orthographic),
                FieldSpec::new('(', ')', Field::Comment),
                FieldSpec::new('{', '}', Field::Source),
            ],
            separators: vec![',', ';'],
            variant_markers: vec!['~', '%'],
            escape: Some('!'),
            elision: "...".to_string(),
            default_source: Some("1".to_string()),
            require_field_after_separator: true,
            bare_text_field: None,
            variants_in_comment: false,
            comment_separator: "\t".to_string(),
        }
    }
}

impl ParserConfig {
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    pub fn variant_markers(&self) -> &[char] {
        &self.variant_markers
    }

    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    pub fn elision(&self) -> &str {
        &self.elision
    }

    pub fn default_source(&self) -> Option<&str> {
        self.default_source.as_deref()
    }

    pub fn require_field_after_separator(&self) -> bool {
        self.require_field_after_separator
    }

    pub fn bare_text_field(&self) -> Option<Field> {
        self.bare_text_field
    }

    pub fn variants_in_comment(&self) -> bool {
        self.variants_in_comment
    }

    pub fn comment_separator(&self) -> &str {
        &self.comment_separator
    }

    /// Replace the delimiter semantics.
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_default_source(mut self, source: Option<&str>) -> Self {
        self.default_source = source.map(str::to_string);
        self
    }

    pub fn with_require_field_after_separator(mut self, require: bool) -> Self {
        self.require_field_after_separator = require;
        self
    }

    pub fn with_bare_text_field(mut self, field: Option<Field>) -> Self {
        self.bare_text_field = field;
        self
    }

    pub fn with_variants_in_comment(mut self, fold: bool) -> Self {
        self.variants_in_comment = fold;
        self
    }

    /// The field spec whose opening delimiter is `open`.
    pub fn field_for_open(&self, open: char) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.open == open)
    }

    /// The field spec filling `field`.
    pub fn spec_for(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }

    /// All `(open, close)` delimiter pairs, in priority order.
    pub fn bracket_pairs(&self) -> Vec<(char, char)> {
        self.fields
            .iter()
            .map(|spec| (spec.open, spec.close))
            .collect()
    }

    /// Transcription fields in priority order.
    pub fn transcriptions(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields
            .iter()
            .map(|spec| spec.field)
            .filter(Field::is_transcription)
    }

    /// Returns `true` if `ch` opens or closes any configured field.
    pub fn is_delimiter(&self, ch: char) -> bool {
        self.fields
            .iter()
            .any(|spec| spec.open == ch || spec.close == ch)
    }

    /// Returns `true` if `ch` opens or closes a transcription field.
    pub fn is_transcription_delimiter(&self, ch: char) -> bool {
        self.fields
            .iter()
            .filter(|spec| spec.field.is_transcription())
            .any(|spec| spec.open == ch || spec.close == ch)
    }

    /// Check the configuration for conflicting characters.
    ///
    /// # Errors
    ///
    /// Returns a description of the first conflict found.
    pub fn validate(&self) -> Result<(), String> {
        if self.transcriptions().next().is_none() {
            return Err("at least one transcription field must be configured".to_string());
        }
        for (index, spec) in self.fields.iter().enumerate() {
            if self.fields[..index].iter().any(|other| other.open == spec.open) {
                return Err(format!("opening delimiter `{}` is used twice", spec.open));
            }
            if self.fields[..index]
                .iter()
                .any(|other| other.field == spec.field)
            {
                return Err(format!("field `{}` is configured twice", spec.field));
            }
        }
        let reserved = self
            .separators
            .iter()
            .chain(&self.variant_markers)
            .chain(self.escape.iter());
        for ch in reserved {
            if self.is_delimiter(*ch) {
                return Err(format!("`{ch}` is both a delimiter and a separator or marker"));
            }
        }
        match self.bare_text_field {
            Some(field) if !field.is_transcription() => Err(format!(
                "bare text field `{field}` is not a transcription"
            )),
            _ => Ok(()),
        }
    }
}
