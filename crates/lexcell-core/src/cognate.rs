//! Cognate sets and cognate judgements.

use serde::{Deserialize, Serialize};

use crate::{Alignment, Form, SegmentSlice, SliceError};

/// A group of forms hypothesised to share a common origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognateSet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CognateSet {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// The assertion that part of one form belongs to one cognate set.
///
/// `segment_slice` keeps the textual `start:end` tokens as stored in the
/// dataset; [`CognateJudgement::slice_for`] interprets them against the
/// referenced form. An empty token list means the whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognateJudgement {
    pub id: String,
    pub form_id: String,
    pub cognateset_id: String,
    #[serde(default)]
    pub segment_slice: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl CognateJudgement {
    pub fn new(
        id: impl Into<String>,
        form_id: impl Into<String>,
        cognateset_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            form_id: form_id.into(),
            cognateset_id: cognateset_id.into(),
            ..Self::default()
        }
    }

    pub fn with_slice(mut self, slice: &SegmentSlice) -> Self {
        self.segment_slice = slice.tokens();
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Interpret the stored slice tokens against `form`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError`] if a token is malformed or out of bounds.
    pub fn slice_for(&self, form: &Form) -> Result<SegmentSlice, SliceError> {
        SegmentSlice::parse_within(&self.segment_slice, form.segment_count())
    }

    /// The declared alignment, or the referenced segments when none is declared.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError`] if the slice does not fit `form`.
    pub fn alignment_or_segments(&self, form: &Form) -> Result<Alignment, SliceError> {
        if let Some(alignment) = &self.alignment {
            return Ok(alignment.clone());
        }
        let slice = self.slice_for(form)?;
        Ok(Alignment::from_segments(&form.segments_in(&slice)?))
    }
}
