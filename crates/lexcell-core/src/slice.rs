//! Segment slices: which segments of a form a cognate judgement covers.
//!
//! The textual notation is one or more `start:end` tokens, where `start` is
//! the 1-based position of the first covered segment and `end` is the
//! 1-based position one past the last covered segment. A bare `n` names the
//! single segment at position `n`. Internally a [`SegmentSlice`] is a list
//! of 0-based half-open ranges, so `"1:3"` becomes `0..2` and a form with six
//! segments is covered completely by `"1:7"`. Every range covers at least
//! one segment, so a token like `"3:3"` is rejected.
//!
//! A slice may consist of several ranges that are not adjacent; this is how
//! discontinuous (non-concatenative) morphemes are recorded.

use std::{fmt, ops::Range, str::FromStr};

use thiserror::Error;
use winnow::{
    Parser as _,
    ascii::dec_uint,
    combinator::{opt, preceded},
    error::{ContextError, ErrMode},
};

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Errors produced while reading or bounds-checking a segment slice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    #[error("segment slice `{token}` is not of the form `start:end`")]
    Malformed { token: String },

    #[error("segment slice `{token}` has start after end")]
    StartAfterEnd { token: String },

    #[error("segment slice `{token}` covers no segment")]
    Empty { token: String },

    #[error("segment slice `{token}` starts before the first segment")]
    StartBeforeFirst { token: String },

    #[error("segment slice `{token}` points outside valid range 1:{}", .len + 1)]
    OutOfBounds { token: String, len: usize },
}

impl SliceError {
    /// Returns `true` for errors about the position of a slice rather than
    /// its syntax.
    pub fn is_bounds_error(&self) -> bool {
        !matches!(self, SliceError::Malformed { .. })
    }

    /// The offending slice token.
    pub fn token(&self) -> &str {
        match self {
            SliceError::Malformed { token }
            | SliceError::StartAfterEnd { token }
            | SliceError::Empty { token }
            | SliceError::StartBeforeFirst { token }
            | SliceError::OutOfBounds { token, .. } => token,
        }
    }
}

/// An ordered list of half-open ranges over one form's segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentSlice {
    ranges: Vec<Range<usize>>,
}

impl SegmentSlice {
    /// Create a slice from 0-based half-open ranges.
    pub fn new(ranges: Vec<Range<usize>>) -> Self {
        Self { ranges }
    }

    /// The slice covering all `len` segments of a form.
    pub fn whole(len: usize) -> Self {
        Self { ranges: vec![0..len] }
    }

    /// Parse textual slice tokens without checking them against a form.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError`] if a token is malformed, starts at `0`, ends
    /// before it starts, or covers no segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell_core::SegmentSlice;
    ///
    /// let slice = SegmentSlice::parse(&["1:3", "5"]).unwrap();
    /// assert_eq!(slice.indices().collect::<Vec<_>>(), vec![0, 1, 4]);
    /// assert!(SegmentSlice::parse(&["4:3"]).is_err());
    /// ```
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, SliceError> {
        let ranges = tokens
            .iter()
            .map(|token| token.as_ref())
            .filter(|token| !token.trim().is_empty())
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ranges })
    }

    /// Parse textual slice tokens for a form with `len` segments.
    ///
    /// When no token is given at all the judgement covers the whole form.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`SegmentSlice::parse`], returns
    /// [`SliceError::OutOfBounds`] if a token reaches past the last segment.
    pub fn parse_within<S: AsRef<str>>(tokens: &[S], len: usize) -> Result<Self, SliceError> {
        let slice = Self::parse(tokens)?;
        if slice.ranges.is_empty() {
            return Ok(Self::whole(len));
        }
        slice.check_bounds(len)?;
        Ok(slice)
    }

    /// Build a slice from 0-based indices, merging maximal consecutive runs.
    ///
    /// Runs are kept in the order the indices arrive in; an index that does
    /// not continue the current run starts a new one.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut ranges: Vec<Range<usize>> = Vec::new();
        for index in indices {
            match ranges.last_mut() {
                Some(last) if last.end == index => last.end += 1,
                _ => ranges.push(index..index + 1),
            }
        }
        Self { ranges }
    }

    /// Check that every range lies within a form of `len` segments.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::OutOfBounds`] naming the first offending range.
    pub fn check_bounds(&self, len: usize) -> Result<(), SliceError> {
        match self.ranges.iter().find(|range| range.end > len) {
            Some(range) => Err(SliceError::OutOfBounds {
                token: format_range(range),
                len,
            }),
            None => Ok(()),
        }
    }

    /// The 0-based half-open ranges of this slice.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// All covered 0-based indices, in slice order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().flat_map(|range| range.clone())
    }

    /// Number of covered indices, counting repeats.
    pub fn index_count(&self) -> usize {
        self.ranges.iter().map(|range| range.len()).sum()
    }

    /// Returns `true` if the slice covers no segment.
    pub fn is_empty(&self) -> bool {
        self.index_count() == 0
    }

    /// Returns `true` if every covered index directly follows the previous one.
    pub fn is_consecutive(&self) -> bool {
        let mut indices = self.indices();
        let Some(mut previous) = indices.next() else {
            return true;
        };
        for index in indices {
            if index != previous + 1 {
                return false;
            }
            previous = index;
        }
        true
    }

    /// The textual `start:end` tokens of this slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell_core::SegmentSlice;
    ///
    /// let slice = SegmentSlice::from_indices([0, 1, 3]);
    /// assert_eq!(slice.tokens(), vec!["1:3", "4:5"]);
    /// ```
    pub fn tokens(&self) -> Vec<String> {
        self.ranges.iter().map(format_range).collect()
    }
}

impl fmt::Display for SegmentSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().join(","))
    }
}

impl FromStr for SegmentSlice {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect();
        Self::parse(&tokens)
    }
}

fn format_range(range: &Range<usize>) -> String {
    format!("{}:{}", range.start + 1, range.end + 1)
}

fn slice_bound(input: &mut &str) -> IResult<usize> {
    dec_uint.parse_next(input)
}

fn slice_token(input: &mut &str) -> IResult<(usize, Option<usize>)> {
    (slice_bound, opt(preceded(':', slice_bound))).parse_next(input)
}

fn parse_token(token: &str) -> Result<Range<usize>, SliceError> {
    let (start, end) = slice_token
        .parse(token.trim())
        .map_err(|_| SliceError::Malformed {
            token: token.to_string(),
        })?;

    if start < 1 {
        return Err(SliceError::StartBeforeFirst {
            token: token.to_string(),
        });
    }

    match end {
        None => Ok(start - 1..start),
        Some(end) if end < start => Err(SliceError::StartAfterEnd {
            token: token.to_string(),
        }),
        Some(end) if end == start => Err(SliceError::Empty {
            token: token.to_string(),
        }),
        Some(end) => Ok(start - 1..end - 1),
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn token_strategy() -> impl Strategy<Value = (usize, usize)> {
        (1usize..200, 1usize..50).prop_map(|(start, width)| (start, start + width))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A single well-formed token formats back to itself.
    fn check_token_round_trip(start: usize, end: usize) -> Result<(), TestCaseError> {
        let token = format!("{start}:{end}");
        let slice = SegmentSlice::parse(&[token.as_str()])
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(slice.tokens(), vec![token]);
        Ok(())
    }

    /// Bounds checking rejects exactly the tokens reaching past `len + 1`.
    fn check_bounds_against_len(start: usize, end: usize, len: usize) -> Result<(), TestCaseError> {
        let token = format!("{start}:{end}");
        let result = SegmentSlice::parse_within(&[token.as_str()], len);
        if end > len + 1 {
            let out_of_bounds = matches!(result, Err(SliceError::OutOfBounds { .. }));
            prop_assert!(out_of_bounds);
        } else {
            prop_assert!(result.is_ok());
        }
        Ok(())
    }

    /// Reversed tokens are always rejected.
    fn check_reversed_rejected(start: usize, end: usize) -> Result<(), TestCaseError> {
        prop_assume!(start > end);
        let token = format!("{start}:{end}");
        let result = SegmentSlice::parse(&[token.as_str()]);
        let reversed = matches!(result, Err(SliceError::StartAfterEnd { .. }));
        prop_assert!(reversed);
        Ok(())
    }

    proptest! {
        #[test]
        fn token_round_trip((start, end) in token_strategy()) {
            check_token_round_trip(start, end)?;
        }

        #[test]
        fn bounds_against_len((start, end) in token_strategy(), len in 0usize..300) {
            check_bounds_against_len(start, end, len)?;
        }

        #[test]
        fn reversed_rejected(start in 2usize..200, end in 1usize..200) {
            check_reversed_rejected(start, end)?;
        }
    }
}
