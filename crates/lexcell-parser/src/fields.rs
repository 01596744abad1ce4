//! Field extraction from a single element.
//!
//! An element is the description of one form, for example
//! `/ta/ [ta.'ʔa] ['ta] (cabello púbico){4}`. The extractor walks the
//! element's top-level bracketed groups and assigns each to the field its
//! delimiters stand for. Transcription fields are taken once; a repeated
//! transcription becomes a variant. Comments and sources may repeat.
//! Whatever is left outside any group is checked for reserved characters
//! and kept as a comment (or as the bare-text transcription, if the dataset
//! writes forms without delimiters).

use log::trace;

use crate::{
    bracket::{BracketError, components},
    config::{Field, ParserConfig},
    error::{CellErrorKind, Diagnostic, ErrorCode, FieldError},
    separator::Splitter,
    span::Span,
};

/// A delimited group captured from an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    field: Field,
    raw: String,
    span: Span,
}

impl Capture {
    pub fn field(&self) -> Field {
        self.field
    }

    /// The captured text including its delimiters.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Span into the element text.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// Fields found in one element, before variant scanning and source
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    transcriptions: Vec<Capture>,
    variants: Vec<String>,
    comments: Vec<String>,
    sources: Vec<Capture>,
    warnings: Vec<Diagnostic>,
}

impl ExtractedFields {
    /// The capture of a transcription field, if present.
    pub fn transcription(&self, field: Field) -> Option<&Capture> {
        self.transcriptions
            .iter()
            .find(|capture| capture.field == field)
    }

    /// Transcriptions in the order they appeared.
    pub fn transcriptions(&self) -> &[Capture] {
        &self.transcriptions
    }

    /// Variants from repeated or marked transcriptions, with their delimiters.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Comment texts without delimiters, in order.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Source groups including delimiters, in order.
    pub fn sources(&self) -> &[Capture] {
        &self.sources
    }

    /// Warnings raised while extracting.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_transcription(&self) -> bool {
        !self.transcriptions.is_empty()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<Capture>,
        Vec<String>,
        Vec<String>,
        Vec<Capture>,
        Vec<Diagnostic>,
    ) {
        (
            self.transcriptions,
            self.variants,
            self.comments,
            self.sources,
            self.warnings,
        )
    }
}

/// Extracts fields from elements according to a [`ParserConfig`].
#[derive(Debug)]
pub struct FieldExtractor<'a> {
    config: &'a ParserConfig,
    splitter: Splitter<'a>,
    pairs: Vec<(char, char)>,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            splitter: Splitter::new(config),
            pairs: config.bracket_pairs(),
        }
    }

    /// Extract all fields from one element.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] with a span into `element` if the element is
    /// empty, has mismatched delimiters, or holds text that belongs to no
    /// field.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell_parser::{Field, ParserConfig, fields::FieldExtractor};
    ///
    /// let config = ParserConfig::default();
    /// let fields = FieldExtractor::new(&config)
    ///     .extract("[iɾũndɨ] (H.F.) (parir)")
    ///     .unwrap();
    /// assert_eq!(fields.transcription(Field::Phonetic).unwrap().raw(), "[iɾũndɨ]");
    /// assert_eq!(fields.comments(), &["H.F.", "parir"]);
    /// ```
    pub fn extract(&self, element: &str) -> Result<ExtractedFields, FieldError> {
        if element.trim().is_empty() {
            return Err(FieldError::new(
                CellErrorKind::EmptyElement,
                Span::new(0..element.len()),
            ));
        }
        trace!(element; "Extracting fields");

        let mut fields = ExtractedFields::default();
        let fragments = self
            .splitter
            .split_kept_spans(element)
            .map_err(|err| bracket_error(err, 0))?;

        for fragment in fragments {
            let text = &element[fragment.range()];
            let body = text.trim_start();
            let mut offset = fragment.start() + (text.len() - body.len());

            let (marker, body) = match body.chars().next() {
                Some(c) if self.config.variant_markers().contains(&c) => {
                    offset += c.len_utf8();
                    (Some(c), &body[c.len_utf8()..])
                }
                _ => (None, body),
            };
            self.extract_fragment(body, offset, marker, &mut fields)?;
        }
        Ok(fields)
    }

    fn extract_fragment(
        &self,
        body: &str,
        offset: usize,
        marker: Option<char>,
        fields: &mut ExtractedFields,
    ) -> Result<(), FieldError> {
        let mut pending = marker;
        let parts = components(body, &self.pairs, self.config.escape())
            .map_err(|err| bracket_error(err, offset))?;

        for part in parts {
            let span = part.span().shifted(offset);
            let Some(open) = part.open() else {
                self.take_residue(part.text(), span, &mut pending, fields)?;
                continue;
            };
            let Some(spec) = self.config.field_for_open(open) else {
                continue;
            };
            let field = spec.field();
            if field.is_transcription() {
                self.take_transcription(field, part.text(), span, pending.take(), fields);
            } else if field == Field::Comment {
                self.take_comment(part.interior(), span, fields);
            } else {
                fields.sources.push(Capture {
                    field,
                    raw: part.text().to_string(),
                    span,
                });
            }
        }

        match pending {
            Some(separator) => {
                let start = offset - separator.len_utf8();
                Err(FieldError::new(
                    CellErrorKind::IllegalSeparator { separator },
                    Span::new(start..offset),
                ))
            }
            None => Ok(()),
        }
    }

    fn take_transcription(
        &self,
        field: Field,
        raw: &str,
        span: Span,
        marker: Option<char>,
        fields: &mut ExtractedFields,
    ) {
        match marker {
            Some(marker) => {
                let marked = format!("{marker}{raw}");
                if fields.transcription(field).is_some() {
                    fields.variants.push(marked);
                } else {
                    fields.warnings.push(
                        Diagnostic::warning(format!(
                            "element `{marked}` was supposed to be a variant, but there is no earlier {field}"
                        ))
                        .with_code(ErrorCode::E103)
                        .with_label(span, "kept as comment"),
                    );
                    fields.comments.push(marked);
                }
            }
            None => match fields.transcription(field) {
                Some(first) => {
                    let first_span = first.span;
                    fields.warnings.push(
                        Diagnostic::warning(format!(
                            "element `{raw}` was an unexpected variant for {field}"
                        ))
                        .with_code(ErrorCode::E103)
                        .with_label(span, format!("repeated {field} transcription"))
                        .with_secondary_label(first_span, format!("first {field} here"))
                        .with_help("mark intended variants with `~` or `%`"),
                    );
                    fields.variants.push(raw.to_string());
                }
                None => fields.transcriptions.push(Capture {
                    field,
                    raw: raw.to_string(),
                    span,
                }),
            },
        }
    }

    fn take_comment(&self, interior: &str, span: Span, fields: &mut ExtractedFields) {
        let mut escaped = false;
        let mut reserved = None;
        for ch in interior.chars() {
            if escaped {
                escaped = false;
                continue;
            }
            if Some(ch) == self.config.escape() {
                escaped = true;
            } else if self.config.is_transcription_delimiter(ch) {
                reserved = Some(ch);
                break;
            }
        }

        if let Some(ch) = reserved {
            fields.warnings.push(
                Diagnostic::warning(format!(
                    "comment `{interior}` contains transcription delimiter `{ch}`"
                ))
                .with_code(ErrorCode::E105)
                .with_label(span, "kept verbatim")
                .with_help(format!(
                    "escape literal delimiters with `{}`",
                    self.config.escape().unwrap_or('!')
                )),
            );
        }
        fields.comments.push(interior.to_string());
    }

    fn take_residue(
        &self,
        text: &str,
        span: Span,
        pending: &mut Option<char>,
        fields: &mut ExtractedFields,
    ) -> Result<(), FieldError> {
        let residue = text.trim();
        if residue.is_empty() {
            return Ok(());
        }
        let start = span.start() + (text.len() - text.trim_start().len());
        let residue_span = Span::new(start..start + residue.len());

        for (index, ch) in residue.char_indices() {
            if self.config.separators().contains(&ch)
                || self.config.variant_markers().contains(&ch)
            {
                let at = start + index;
                return Err(FieldError::new(
                    CellErrorKind::IllegalSeparator { separator: ch },
                    Span::new(at..at + ch.len_utf8()),
                ));
            }
        }
        if residue
            .chars()
            .any(|c| Some(c) == self.config.escape() || self.config.is_delimiter(c))
        {
            return Err(FieldError::new(
                CellErrorKind::UnparsableResidue {
                    residue: residue.to_string(),
                },
                residue_span,
            ));
        }

        match self.config.bare_text_field() {
            Some(field) if pending.is_some() || fields.transcription(field).is_none() => {
                let raw = match self.config.spec_for(field) {
                    Some(spec) => format!("{}{residue}{}", spec.open(), spec.close()),
                    None => residue.to_string(),
                };
                self.take_transcription(field, &raw, residue_span, pending.take(), fields);
            }
            _ => fields.comments.push(residue.to_string()),
        }
        Ok(())
    }
}

fn bracket_error(err: BracketError, offset: usize) -> FieldError {
    FieldError::new(
        CellErrorKind::BracketMismatch {
            delimiter: err.delimiter(),
        },
        err.span().shifted(offset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(element: &str) -> Result<ExtractedFields, FieldError> {
        let config = ParserConfig::default();
        FieldExtractor::new(&config).extract(element)
    }

    #[test]
    fn test_extract_fields_in_any_order() {
        let fields = extract("{2} (note) <kwa> /kwa/").unwrap();
        assert_eq!(fields.transcription(Field::Orthographic).unwrap().raw(), "<kwa>");
        assert_eq!(fields.transcription(Field::Phonemic).unwrap().raw(), "/kwa/");
        assert_eq!(fields.sources()[0].raw(), "{2}");
        assert_eq!(fields.comments(), &["note"]);
        assert!(fields.warnings().is_empty());
    }

    #[test]
    fn test_extract_repeated_transcription_is_variant() {
        let fields = extract("/ta/ [ta.'ʔa] ['ta] (cabello púbico){4}").unwrap();
        assert_eq!(fields.transcription(Field::Phonetic).unwrap().raw(), "[ta.'ʔa]");
        assert_eq!(fields.variants(), &["['ta]"]);
        assert_eq!(fields.warnings().len(), 1);
        assert_eq!(fields.warnings()[0].code(), Some(ErrorCode::E103));
        assert_eq!(fields.warnings()[0].labels()[0].span(), Span::new(15..20));
    }

    #[test]
    fn test_extract_marked_variant() {
        let fields = extract("[dʒi'tɨka] {2} ~ [ʒi'tɨka] {2}").unwrap();
        assert_eq!(fields.variants(), &["~[ʒi'tɨka]"]);
        assert_eq!(fields.sources().len(), 2);
        assert!(fields.warnings().is_empty());
    }

    #[test]
    fn test_extract_variant_without_base_goes_to_comment() {
        let fields = extract("/a/ ~[b]").unwrap();
        assert!(fields.variants().is_empty());
        assert_eq!(fields.comments(), &["~[b]"]);
        assert_eq!(fields.warnings()[0].code(), Some(ErrorCode::E103));
    }

    #[test]
    fn test_extract_dangling_marker() {
        let err = extract("[a] ~ (note)").unwrap_err();
        assert_eq!(err.kind, CellErrorKind::IllegalSeparator { separator: '~' });
        assert_eq!(err.span, Span::new(4..5));
    }

    #[test]
    fn test_extract_nested_comment_kept() {
        let fields = extract("<eniãcũpũ> (good-tasting (sweet honey)){2}").unwrap();
        assert_eq!(fields.comments(), &["good-tasting (sweet honey)"]);
        assert!(fields.warnings().is_empty());
    }

    #[test]
    fn test_extract_comment_with_transcription_delimiters_warns() {
        let fields = extract("[a] (see [b])").unwrap();
        assert_eq!(fields.comments(), &["see [b]"]);
        assert_eq!(fields.warnings()[0].code(), Some(ErrorCode::E105));
    }

    #[test]
    fn test_extract_comment_with_escaped_delimiter() {
        let fields = extract("/aha/ (exclam. !/ int.)").unwrap();
        assert_eq!(fields.comments(), &["exclam. !/ int."]);
        assert!(fields.warnings().is_empty());
    }

    #[test]
    fn test_extract_bare_residue_becomes_comment() {
        let fields = extract("[a] loanword").unwrap();
        assert_eq!(fields.comments(), &["loanword"]);
    }

    #[test]
    fn test_extract_unparsable_residue() {
        let err = extract("!!").unwrap_err();
        assert_eq!(
            err.kind,
            CellErrorKind::UnparsableResidue {
                residue: "!!".to_string()
            }
        );
    }

    #[test]
    fn test_extract_illegal_separator_in_residue() {
        let err = extract("[a] b, c").unwrap_err();
        assert_eq!(err.kind, CellErrorKind::IllegalSeparator { separator: ',' });
        assert_eq!(err.span, Span::new(5..6));
    }

    #[test]
    fn test_extract_empty_element() {
        let err = extract("   ").unwrap_err();
        assert_eq!(err.kind, CellErrorKind::EmptyElement);
    }

    #[test]
    fn test_extract_bare_text_field() {
        let config = ParserConfig::default().with_bare_text_field(Some(Field::Phonemic));
        let fields = FieldExtractor::new(&config)
            .extract("lεksedata ~ lεksidata (note)")
            .unwrap();
        assert_eq!(
            fields.transcription(Field::Phonemic).unwrap().raw(),
            "/lεksedata/"
        );
        assert_eq!(fields.variants(), &["~/lεksidata/"]);
        assert_eq!(fields.comments(), &["note"]);
    }
}
