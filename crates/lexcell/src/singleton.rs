//! Singleton cognate sets for unclassified segments.
//!
//! After cognate coding, every segment of every form should belong to at
//! least one cognate set. The [`SingletonBuilder`] creates a cognate set
//! with a single judgement for each part of a form that nothing covers yet.
//!
//! The builder is a completion pass: running it twice on a wordlist that
//! already received its singletons creates nothing new, but running it on
//! the original wordlist again creates a second set of singletons.

use log::{debug, info, warn};

use lexcell_core::{
    Alignment, CognateJudgement, CognateSet, Form, SegmentSlice, identifier::IdRegistry,
};

use crate::{
    config::{SingletonConfig, SingletonMode},
    wordlist::Wordlist,
};

/// Cognate sets and judgements created by a [`SingletonBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Singletons {
    pub cognatesets: Vec<CognateSet>,
    pub judgements: Vec<CognateJudgement>,
}

impl Singletons {
    /// Number of synthesized cognate sets.
    pub fn len(&self) -> usize {
        self.cognatesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cognatesets.is_empty()
    }

    /// Append the singletons to `wordlist`.
    pub fn apply_to(self, wordlist: &mut Wordlist) {
        wordlist.cognatesets.extend(self.cognatesets);
        wordlist.judgements.extend(self.judgements);
    }
}

/// Creates singleton cognate sets for uncovered segments.
#[derive(Debug)]
pub struct SingletonBuilder<'a> {
    config: &'a SingletonConfig,
}

impl<'a> SingletonBuilder<'a> {
    pub fn new(config: &'a SingletonConfig) -> Self {
        Self { config }
    }

    /// Compute the singletons `wordlist` is missing.
    ///
    /// The wordlist itself is not changed; see [`Singletons::apply_to`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell::{config::SingletonConfig, singleton::SingletonBuilder, wordlist::Wordlist};
    /// use lexcell_core::{CognateJudgement, Form};
    ///
    /// let mut wordlist = Wordlist::default();
    /// wordlist.forms.push(Form::new("f1", &["t", "a", "k", "u"]).with_form("taku"));
    /// let mut judgement = CognateJudgement::new("j1", "f1", "c1");
    /// judgement.segment_slice = vec!["1:3".to_string()];
    /// wordlist.judgements.push(judgement);
    ///
    /// let config = SingletonConfig::default();
    /// let singletons = SingletonBuilder::new(&config).build(&wordlist);
    /// assert_eq!(singletons.cognatesets[0].id, "X_f1_1");
    /// assert_eq!(singletons.judgements[0].segment_slice, vec!["3:5"]);
    /// ```
    pub fn build(&self, wordlist: &Wordlist) -> Singletons {
        info!(mode:? = self.config.mode(); "Creating singleton cognate sets");

        let mut set_ids = IdRegistry::with_ids(wordlist.cognatesets.iter().map(|s| s.id.as_str()));
        let mut judgement_ids =
            IdRegistry::with_ids(wordlist.judgements.iter().map(|j| j.id.as_str()));
        let mut singletons = Singletons::default();

        for form in &wordlist.forms {
            if form.is_elided() {
                continue;
            }
            let Some(uncovered) = self.uncovered(form, wordlist) else {
                continue;
            };
            for range in uncovered.ranges() {
                let streak = SegmentSlice::new(vec![range.clone()]);
                let segments = &form.segments[range.clone()];

                let set_id = set_ids.allocate_numbered(&format!("X_{}", form.id));
                let mut cognateset = CognateSet::new(set_id.as_str());
                if let Some(concept) = form.concept_ids.first() {
                    cognateset = cognateset.with_name(concept.as_str());
                }
                if let Some(status) = self.config.status() {
                    cognateset = cognateset.with_status(status);
                }

                let judgement =
                    CognateJudgement::new(judgement_ids.allocate(&set_id), &form.id, &set_id)
                        .with_slice(&streak)
                        .with_alignment(Alignment::from_segments(segments));

                debug!(form = form.id.as_str(), slice:% = streak; "Created singleton {set_id}");
                singletons.cognatesets.push(cognateset);
                singletons.judgements.push(judgement);
            }
        }

        info!(created = singletons.len(); "Singleton cognate sets created");
        singletons
    }

    /// The part of `form` that needs singletons, or `None` if nothing does.
    fn uncovered(&self, form: &Form, wordlist: &Wordlist) -> Option<SegmentSlice> {
        let mut judgements = wordlist.judgements_for(&form.id).peekable();
        match self.config.mode() {
            SingletonMode::WholeForm => {
                if judgements.peek().is_some() || form.segments.is_empty() {
                    return None;
                }
                Some(SegmentSlice::whole(form.segment_count()))
            }
            SingletonMode::BySegment => {
                let mut covered = vec![false; form.segment_count()];
                for judgement in judgements {
                    let slice = match judgement.slice_for(form) {
                        Ok(slice) => slice,
                        Err(err) => {
                            warn!(
                                judgement = judgement.id.as_str();
                                "Ignoring judgement for singletons: {err}"
                            );
                            continue;
                        }
                    };
                    for index in slice.indices() {
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
                (!uncovered.is_empty()).then_some(uncovered)
            }
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// A form of 1 to 12 segments with up to four judgements over it.
    fn wordlist_strategy() -> impl Strategy<Value = Wordlist> {
        (1usize..12)
            .prop_flat_map(|len| {
                let judgement = (0..len, 0..len).prop_map(|(a, b)| (a.min(b), a.max(b) + 1));
                (Just(len), prop::collection::vec(judgement, 0..4))
            })
            .prop_map(|(len, ranges)| {
                let segments: Vec<String> = (0..len).map(|i| format!("s{i}")).collect();
                let form = Form::new("f1", &segments).with_form(segments.concat());
                let judgements = ranges
                    .into_iter()
                    .enumerate()
                    .map(|(i, (start, end))| {
                        CognateJudgement::new(format!("j{i}"), "f1", format!("c{i}"))
                            .with_slice(&SegmentSlice::new(vec![start..end]))
                    })
                    .collect();
                Wordlist {
                    forms: vec![form],
                    cognatesets: Vec::new(),
                    judgements,
                }
            })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// After applying the singletons every segment is covered exactly as
    /// often as before, plus once if it was uncovered.
    fn check_every_segment_covered(wordlist: Wordlist) -> Result<(), TestCaseError> {
        let config = SingletonConfig::default();
        let singletons = SingletonBuilder::new(&config).build(&wordlist);
        let len = wordlist.forms[0].segment_count();

        let count = |judgements: &[CognateJudgement]| -> Result<Vec<usize>, TestCaseError> {
            let mut counts = vec![0; len];
            for judgement in judgements {
                let slice = judgement
                    .slice_for(&wordlist.forms[0])
                    .map_err(|err| TestCaseError::fail(err.to_string()))?;
                for index in slice.indices() {
                    counts[index] += 1;
                }
            }
            Ok(counts)
        };

        let before = count(&wordlist.judgements)?;
        let added = count(&singletons.judgements)?;
        for index in 0..len {
            prop_assert_eq!(added[index], usize::from(before[index] == 0));
        }
        Ok(())
    }

    /// Synthesized streaks are maximal: no two singletons of one form touch.
    fn check_streaks_are_maximal(wordlist: Wordlist) -> Result<(), TestCaseError> {
        let config = SingletonConfig::default();
        let singletons = SingletonBuilder::new(&config).build(&wordlist);

        let mut ranges = Vec::new();
        for judgement in &singletons.judgements {
            let slice = judgement
                .slice_for(&wordlist.forms[0])
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(slice.ranges().len(), 1);
            ranges.push(slice.ranges()[0].clone());
        }
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn every_segment_covered(wordlist in wordlist_strategy()) {
            check_every_segment_covered(wordlist)?;
        }

        #[test]
        fn streaks_are_maximal(wordlist in wordlist_strategy()) {
            check_streaks_are_maximal(wordlist)?;
        }
    }
}
