//! Alignments of cognate judgements.
//!
//! An alignment is the sequence of segments a judgement contributes to its
//! cognate set, padded with [`GAP`] tokens so that every member of the set
//! lines up column by column.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Segment, SegmentSlice};

/// The gap token inside alignments.
pub const GAP: &str = "-";

/// An aligned segment sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alignment(Vec<Segment>);

impl Alignment {
    pub fn new(tokens: Vec<Segment>) -> Self {
        Self(tokens)
    }

    /// Build an alignment from segments, without any gaps.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        Self(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn tokens(&self) -> &[Segment] {
        &self.0
    }

    /// Length including gaps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The aligned segments with every gap token removed.
    pub fn without_gaps(&self) -> Vec<&str> {
        self.0
            .iter()
            .map(String::as_str)
            .filter(|token| *token != GAP)
            .collect()
    }

    /// Read a segment slice and alignment from a brace-marked segment string.
    ///
    /// `text` holds space-separated segments; the segments between `{` and
    /// `}` belong to the judgement. Several brace groups produce several
    /// ranges. A missing `{` starts the group at the beginning of the form
    /// and a missing `}` extends it to the end. Gap tokens inside a group are
    /// kept in the alignment but do not count toward the slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell_core::Alignment;
    ///
    /// let (slice, alignment) = Alignment::from_braces("t {e - x} t");
    /// assert_eq!(slice.tokens(), vec!["2:4"]);
    /// assert_eq!(alignment.tokens(), &["e", "-", "x"]);
    /// ```
    pub fn from_braces(text: &str) -> (SegmentSlice, Alignment) {
        let mut ranges = Vec::new();
        let mut tokens = Vec::new();
        let mut offset = 0;
        let mut rest = text;

        loop {
            let (before, remainder) = rest.split_once('{').unwrap_or(("", rest));
            let (content, remainder) = remainder.split_once('}').unwrap_or((remainder, ""));

            let skipped = before.split_whitespace().filter(|s| *s != GAP).count();
            let group: Vec<&str> = content.split_whitespace().collect();
            let width = group.iter().filter(|s| **s != GAP).count();

            let start = offset + skipped;
            ranges.push(start..start + width);
            tokens.extend(group.into_iter().map(str::to_string));
            offset = start + width;

            if !remainder.contains('{') {
                break;
            }
            rest = remainder;
        }

        (SegmentSlice::new(ranges), Alignment(tokens))
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl From<Vec<Segment>> for Alignment {
    fn from(tokens: Vec<Segment>) -> Self {
        Self(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_gaps() {
        let alignment = Alignment::new(vec!["t".into(), "-".into(), "a".into()]);
        assert_eq!(alignment.len(), 3);
        assert_eq!(alignment.without_gaps(), vec!["t", "a"]);
    }

    #[test]
    fn test_from_braces_missing_close() {
        let (slice, alignment) = Alignment::from_braces("t{e x t");
        assert_eq!(slice.ranges(), &[1..4]);
        assert_eq!(alignment.tokens(), &["e", "x", "t"]);
    }

    #[test]
    fn test_from_braces_missing_open() {
        let (slice, alignment) = Alignment::from_braces("t e x}t");
        assert_eq!(slice.ranges(), &[0..3]);
        assert_eq!(alignment.tokens(), &["t", "e", "x"]);
    }

    #[test]
    fn test_from_braces_no_braces() {
        let (slice, alignment) = Alignment::from_braces("t e x t");
        assert_eq!(slice.tokens(), vec!["1:5"]);
        assert_eq!(alignment.len(), 4);
    }

    #[test]
    fn test_from_braces_multiple_groups() {
        let (slice, alignment) = Alignment::from_braces("{k} a {t a}");
        assert_eq!(slice.ranges(), &[0..1, 2..4]);
        assert_eq!(alignment.tokens(), &["k", "t", "a"]);
    }

    #[test]
    fn test_display() {
        let alignment = Alignment::new(vec!["a".into(), "-".into()]);
        assert_eq!(alignment.to_string(), "a -");
    }
}
