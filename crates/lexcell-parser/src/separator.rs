//! Splitting cell text into elements and elements into variant fragments.
//!
//! A cell may describe several forms, separated by hard separators (`,` and
//! `;` by default). A separator only splits where no bracket is open, and by
//! default only where the next non-space text opens a new field, so commas
//! inside free text stay where they are.
//!
//! Within one element, variant markers (`~`, `%`) at bracket depth zero
//! start a new fragment. The marker is kept at the front of the fragment it
//! introduces so the field extractor knows the fragment holds a variant.

use crate::{
    bracket::{BracketError, Step, Tracker},
    config::ParserConfig,
    span::Span,
};

/// Separator-aware splitter for one cell convention.
#[derive(Debug)]
pub struct Splitter<'a> {
    config: &'a ParserConfig,
    pairs: Vec<(char, char)>,
}

impl<'a> Splitter<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            pairs: config.bracket_pairs(),
        }
    }

    /// Split cell text into trimmed elements.
    ///
    /// # Errors
    ///
    /// Returns a [`BracketError`] if the delimiters of the whole text do not
    /// match; the cell cannot be split reliably in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell_parser::{ParserConfig, separator::Splitter};
    ///
    /// let config = ParserConfig::default();
    /// let splitter = Splitter::new(&config);
    /// let elements = splitter.split("/a/ (one, two), [b]{2};").unwrap();
    /// assert_eq!(elements, vec!["/a/ (one, two)", "[b]{2}"]);
    /// ```
    pub fn split<'s>(&self, text: &'s str) -> Result<Vec<&'s str>, BracketError> {
        Ok(self
            .split_spans(text)?
            .into_iter()
            .map(|span| &text[span.range()])
            .collect())
    }

    /// Like [`Splitter::split`], returning the byte span of each element.
    pub fn split_spans(&self, text: &str) -> Result<Vec<Span>, BracketError> {
        let mut tracker = Tracker::new(&self.pairs, self.config.escape());
        let mut pieces = Vec::new();
        let mut start = 0;

        for (offset, ch) in text.char_indices() {
            let step = tracker.step(offset, ch)?;
            let next = offset + ch.len_utf8();
            if step == Step::Text
                && tracker.depth() == 0
                && self.config.separators().contains(&ch)
                && self.field_follows(&text[next..])
            {
                pieces.push(start..offset);
                start = next;
            }
        }
        tracker.finish()?;
        pieces.push(start..text.len());

        let last = pieces.len() - 1;
        Ok(pieces
            .into_iter()
            .enumerate()
            .filter_map(|(index, range)| self.trim(text, range.start, range.end, index == last))
            .collect())
    }

    /// Split one element at top-level variant markers.
    ///
    /// Every fragment after the first starts with the marker that introduced
    /// it. Whitespace-only fragments are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`BracketError`] if the element's delimiters do not match.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell_parser::{ParserConfig, separator::Splitter};
    ///
    /// let config = ParserConfig::default();
    /// let splitter = Splitter::new(&config);
    /// let fragments = splitter.split_kept("[dʒi'tɨka] {2} ~ [ʒi'tɨka] {2}").unwrap();
    /// assert_eq!(fragments, vec!["[dʒi'tɨka] {2} ", "~ [ʒi'tɨka] {2}"]);
    /// ```
    pub fn split_kept<'s>(&self, element: &'s str) -> Result<Vec<&'s str>, BracketError> {
        Ok(self
            .split_kept_spans(element)?
            .into_iter()
            .map(|span| &element[span.range()])
            .collect())
    }

    /// Like [`Splitter::split_kept`], returning the byte span of each fragment.
    pub fn split_kept_spans(&self, element: &str) -> Result<Vec<Span>, BracketError> {
        let mut tracker = Tracker::new(&self.pairs, self.config.escape());
        let mut fragments = Vec::new();
        let mut start = 0;

        for (offset, ch) in element.char_indices() {
            let step = tracker.step(offset, ch)?;
            if step == Step::Text
                && tracker.depth() == 0
                && self.config.variant_markers().contains(&ch)
            {
                fragments.push(Span::new(start..offset));
                start = offset;
            }
        }
        tracker.finish()?;
        fragments.push(Span::new(start..element.len()));

        fragments.retain(|span| !element[span.range()].trim().is_empty());
        Ok(fragments)
    }

    fn field_follows(&self, rest: &str) -> bool {
        if !self.config.require_field_after_separator() {
            return true;
        }
        let rest = rest.trim_start();
        let elision = self.config.elision();
        (!elision.is_empty() && rest.starts_with(elision))
            || rest
                .chars()
                .next()
                .is_some_and(|c| self.config.field_for_open(c).is_some())
    }

    /// Trim whitespace, and stray separators at the end of the last element.
    fn trim(&self, text: &str, start: usize, end: usize, is_last: bool) -> Option<Span> {
        let piece = &text[start..end];
        let leading = piece.len() - piece.trim_start().len();
        let piece = piece.trim_start();
        let piece = if is_last {
            piece.trim_end_matches(|c: char| {
                c.is_whitespace() || self.config.separators().contains(&c)
            })
        } else {
            piece.trim_end()
        };
        if piece.is_empty() {
            return None;
        }
        let start = start + leading;
        Some(Span::new(start..start + piece.len()))
    }
}
