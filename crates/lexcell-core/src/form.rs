//! Forms and their segment sequences.

use serde::{Deserialize, Serialize};

use crate::{SegmentSlice, SliceError};

/// An atomic phoneme token.
pub type Segment = String;

/// One attested realization of a concept in a language.
///
/// The segment sequence is produced by an external segmenter and owned by
/// the form; judgements only refer to it by form id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Form {
    /// Create a form from its id and segments.
    pub fn new<S: AsRef<str>>(id: impl Into<String>, segments: &[S]) -> Self {
        Self {
            id: id.into(),
            segments: segments.iter().map(|s| s.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }

    pub fn with_concept(mut self, concept_id: impl Into<String>) -> Self {
        self.concept_ids.push(concept_id.into());
        self
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the form text is missing, empty, or the `-` placeholder.
    pub fn is_elided(&self) -> bool {
        match self.form.as_deref().map(str::trim) {
            None | Some("") | Some("-") => true,
            Some(_) => false,
        }
    }

    /// The segments a slice refers to, in slice order.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::OutOfBounds`] if the slice reaches past the
    /// last segment.
    pub fn segments_in(&self, slice: &SegmentSlice) -> Result<Vec<&str>, SliceError> {
        slice.check_bounds(self.segments.len())?;
        Ok(slice
            .indices()
            .filter_map(|index| self.segments.get(index).map(String::as_str))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_elided() {
        let form = Form::new("f1", &["a"]);
        assert!(form.is_elided());
        assert!(form.clone().with_form("-").is_elided());
        assert!(form.clone().with_form("  ").is_elided());
        assert!(!form.with_form("a").is_elided());
    }

    #[test]
    fn test_segments_in() {
        let form = Form::new("f1", &["i", "ɾ", "ũ", "n", "d", "ɨ"]);
        let slice = SegmentSlice::parse(&["2:4", "6"]).unwrap();
        assert_eq!(form.segments_in(&slice).unwrap(), vec!["ɾ", "ũ", "ɨ"]);

        let too_long = SegmentSlice::parse(&["5:8"]).unwrap();
        assert!(form.segments_in(&too_long).is_err());
    }
}
