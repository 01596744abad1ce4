//! Validation of cognate judgements against their forms.
//!
//! The [`Validator`] never changes the wordlist. It inspects every
//! judgement's segment slice and alignment and collects [`Finding`]s in a
//! [`ValidationReport`]. Which findings are errors, which are warnings and
//! which are not reported at all is decided by the [`ValidationPolicy`].
//!
//! Checks, per form:
//! - every judgement refers to an existing form (E205)
//! - every slice parses (E206) and lies within the form (E200)
//! - no segment is claimed twice (E201), subject to the policy
//! - slices are consecutive, in strict mode only (E202)
//! - a declared alignment equals the referenced segments once gaps are
//!   removed (E203)
//! - declared alignments within one cognate set have one length (E204)
//! - optionally, every segment is covered by some judgement (E207)

use std::fmt;

use indexmap::IndexMap;
use log::{debug, info};

use lexcell_core::{CognateJudgement, Form, SegmentSlice};
use lexcell_parser::{
    Diagnostic,
    error::{ErrorCode, Severity},
};

use crate::{config::ValidationPolicy, wordlist::Wordlist};

/// The kinds of validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    UnknownForm,
    MalformedSlice,
    SliceOutOfBounds,
    Overlap,
    NonConsecutive,
    AlignmentMismatch,
    AlignmentLength,
    Uncovered,
}

impl FindingKind {
    /// The diagnostic code for this kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            FindingKind::SliceOutOfBounds => ErrorCode::E200,
            FindingKind::Overlap => ErrorCode::E201,
            FindingKind::NonConsecutive => ErrorCode::E202,
            FindingKind::AlignmentMismatch => ErrorCode::E203,
            FindingKind::AlignmentLength => ErrorCode::E204,
            FindingKind::UnknownForm => ErrorCode::E205,
            FindingKind::MalformedSlice => ErrorCode::E206,
            FindingKind::Uncovered => ErrorCode::E207,
        }
    }
}

/// One problem found in the judgements of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    kind: FindingKind,
    severity: Severity,
    message: String,
    form_id: Option<String>,
    cognateset_id: Option<String>,
    judgement_ids: Vec<String>,
}

impl Finding {
    fn new(kind: FindingKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            form_id: None,
            cognateset_id: None,
            judgement_ids: Vec::new(),
        }
    }

    fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    fn with_form(mut self, form_id: &str) -> Self {
        self.form_id = Some(form_id.to_string());
        self
    }

    fn with_cognateset(mut self, cognateset_id: &str) -> Self {
        self.cognateset_id = Some(cognateset_id.to_string());
        self
    }

    fn with_judgement(mut self, judgement_id: &str) -> Self {
        self.judgement_ids.push(judgement_id.to_string());
        self
    }

    pub fn kind(&self) -> FindingKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    pub fn cognateset_id(&self) -> Option<&str> {
        self.cognateset_id.as_deref()
    }

    /// The judgements involved, in the order they appear in the wordlist.
    pub fn judgement_ids(&self) -> &[String] {
        &self.judgement_ids
    }

    /// Convert into a [`Diagnostic`] for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = match self.severity {
            Severity::Error => Diagnostic::error(&self.message),
            Severity::Warning => Diagnostic::warning(&self.message),
        };
        diagnostic.with_code(self.kind.code())
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.kind.code(), self.message)
    }
}

/// All findings of one validation run, in wordlist order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Returns `true` if nothing at all was found.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings concerning one form.
    pub fn for_form<'a>(&'a self, form_id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings
            .iter()
            .filter(move |finding| finding.form_id.as_deref() == Some(form_id))
    }

    /// Every finding as a [`Diagnostic`].
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        self.findings.iter().map(Finding::to_diagnostic).collect()
    }
}

/// A judgement whose slice has been interpreted against its form.
struct Resolved<'w> {
    judgement: &'w CognateJudgement,
    slice: SegmentSlice,
}

/// Validates the cognate judgements of a wordlist.
#[derive(Debug)]
pub struct Validator<'a> {
    policy: &'a ValidationPolicy,
}

impl<'a> Validator<'a> {
    pub fn new(policy: &'a ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Check every judgement of `wordlist`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell::{config::ValidationPolicy, validate::Validator, wordlist::Wordlist};
    /// use lexcell_core::{CognateJudgement, Form, SegmentSlice};
    ///
    /// let mut wordlist = Wordlist::default();
    /// wordlist.forms.push(Form::new("f1", &["i", "ɾ", "ũ", "n", "d", "ɨ"]));
    /// wordlist.judgements.push(
    ///     CognateJudgement::new("j1", "f1", "c1")
    ///         .with_slice(&SegmentSlice::parse(&["1:7"]).unwrap()),
    /// );
    ///
    /// let policy = ValidationPolicy::default();
    /// let report = Validator::new(&policy).validate(&wordlist);
    /// assert!(report.is_clean());
    /// ```
    pub fn validate(&self, wordlist: &Wordlist) -> ValidationReport {
        info!(
            judgements = wordlist.judgements.len(),
            strict = self.policy.strict();
            "Validating cognate judgements"
        );

        let forms: IndexMap<&str, &Form> = wordlist
            .forms
            .iter()
            .map(|form| (form.id.as_str(), form))
            .collect();

        let mut findings = Vec::new();
        let mut by_form: IndexMap<&str, Vec<Resolved<'_>>> = IndexMap::new();
        for judgement in &wordlist.judgements {
            let Some(form) = forms.get(judgement.form_id.as_str()) else {
                findings.push(
                    Finding::error(
                        FindingKind::UnknownForm,
                        format!(
                            "judgement {} refers to unknown form {}",
                            judgement.id, judgement.form_id
                        ),
                    )
                    .with_judgement(&judgement.id)
                    .with_cognateset(&judgement.cognateset_id),
                );
                continue;
            };
            if let Some(slice) = self.resolve(judgement, form, &mut findings) {
                by_form
                    .entry(form.id.as_str())
                    .or_default()
                    .push(Resolved { judgement, slice });
            }
        }

        let mut set_lengths: IndexMap<&str, (usize, &str)> = IndexMap::new();
        for form in forms.values() {
            let resolved = by_form.get(form.id.as_str()).map_or(&[][..], Vec::as_slice);
            for item in resolved {
                self.check_alignment(form, item, &mut set_lengths, &mut findings);
            }
            self.check_overlaps(form, resolved, &mut findings);
            if self.policy.report_uncovered() && !form.is_elided() {
                check_coverage(form, resolved, &mut findings);
            }
        }

        debug!(findings = findings.len(); "Validation finished");
        ValidationReport { findings }
    }

    /// Interpret the slice of one judgement; `None` if it is unusable.
    fn resolve(
        &self,
        judgement: &CognateJudgement,
        form: &Form,
        findings: &mut Vec<Finding>,
    ) -> Option<SegmentSlice> {
        let slice = match judgement.slice_for(form) {
            Ok(slice) => slice,
            Err(err) => {
                let kind = if err.is_bounds_error() {
                    FindingKind::SliceOutOfBounds
                } else {
                    FindingKind::MalformedSlice
                };
                findings.push(
                    Finding::error(
                        kind,
                        format!("in judgement {}, {err}", judgement.id),
                    )
                    .with_form(&form.id)
                    .with_cognateset(&judgement.cognateset_id)
                    .with_judgement(&judgement.id),
                );
                return None;
            }
        };

        if self.policy.strict() && !slice.is_consecutive() {
            findings.push(
                Finding::warning(
                    FindingKind::NonConsecutive,
                    format!(
                        "in judgement {}, segment slice {slice} is not consecutive, so the morpheme is non-contiguous",
                        judgement.id
                    ),
                )
                .with_form(&form.id)
                .with_cognateset(&judgement.cognateset_id)
                .with_judgement(&judgement.id),
            );
        }
        Some(slice)
    }

    fn check_alignment<'w>(
        &self,
        form: &Form,
        item: &Resolved<'w>,
        set_lengths: &mut IndexMap<&'w str, (usize, &'w str)>,
        findings: &mut Vec<Finding>,
    ) {
        let judgement = item.judgement;
        let Some(alignment) = &judgement.alignment else {
            return;
        };

        let aligned = alignment.without_gaps();
        let segments: Vec<&str> = item
            .slice
            .indices()
            .filter_map(|index| form.segments.get(index).map(String::as_str))
            .collect();
        if aligned != segments {
            findings.push(
                Finding::error(
                    FindingKind::AlignmentMismatch,
                    format!(
                        "in judgement {}, alignment `{}` does not match segments `{}`",
                        judgement.id,
                        aligned.join(" "),
                        segments.join(" ")
                    ),
                )
                .with_form(&form.id)
                .with_cognateset(&judgement.cognateset_id)
                .with_judgement(&judgement.id),
            );
        }

        let (expected, first_form) = *set_lengths
            .entry(judgement.cognateset_id.as_str())
            .or_insert((alignment.len(), judgement.form_id.as_str()));
        if alignment.len() != expected {
            findings.push(
                Finding::error(
                    FindingKind::AlignmentLength,
                    format!(
                        "in cognate set {}, alignment of form {} has length {}, expected {expected} as in form {first_form}",
                        judgement.cognateset_id,
                        form.id,
                        alignment.len()
                    ),
                )
                .with_form(&form.id)
                .with_cognateset(&judgement.cognateset_id)
                .with_judgement(&judgement.id),
            );
        }
    }

    fn check_overlaps(&self, form: &Form, resolved: &[Resolved<'_>], findings: &mut Vec<Finding>) {
        for (index, first) in resolved.iter().enumerate() {
            for second in &resolved[index + 1..] {
                let shared: Vec<usize> = first
                    .slice
                    .indices()
                    .filter(|i| second.slice.indices().any(|j| j == *i))
                    .collect();
                if shared.is_empty() {
                    continue;
                }

                let same_set = first.judgement.cognateset_id == second.judgement.cognateset_id;
                let severity = if self.policy.strict() {
                    Severity::Error
                } else if same_set || !self.policy.allow_nonconcatenative() {
                    Severity::Warning
                } else {
                    continue;
                };

                let message = if same_set {
                    format!(
                        "in form {}, segments {} are claimed twice by cognate set {}",
                        form.id,
                        SegmentSlice::from_indices(shared.iter().copied()),
                        first.judgement.cognateset_id
                    )
                } else {
                    format!(
                        "in form {}, segments {} are in both cognate sets {} and {}",
                        form.id,
                        SegmentSlice::from_indices(shared.iter().copied()),
                        first.judgement.cognateset_id,
                        second.judgement.cognateset_id
                    )
                };
                findings.push(
                    Finding::new(FindingKind::Overlap, severity, message)
                        .with_form(&form.id)
                        .with_judgement(&first.judgement.id)
                        .with_judgement(&second.judgement.id),
                );
            }
        }
    }
}

/// Report every run of segments that no judgement covers.
fn check_coverage(form: &Form, resolved: &[Resolved<'_>], findings: &mut Vec<Finding>) {
    let mut covered = vec![false; form.segment_count()];
    for item in resolved {
        for index in item.slice.indices() {
            if let Some(flag) = covered.get_mut(index) {
                *flag = true;
            }
        }
    }

    let uncovered = SegmentSlice::from_indices(
        covered
            .iter()
            .enumerate()
            .filter(|(_, covered)| !**covered)
            .map(|(index, _)| index),
    );
    for range in uncovered.ranges() {
        let streak = SegmentSlice::new(vec![range.clone()]);
        let segments = form.segments[range.clone()].join(" ");
        findings.push(
            Finding::warning(
                FindingKind::Uncovered,
                format!(
                    "in form {}, segments {streak} ({segments}) belong to no cognate set",
                    form.id
                ),
            )
            .with_form(&form.id),
        );
    }
}
