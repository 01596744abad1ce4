//! Segments claimed by several cognate sets.
//!
//! Non-concatenative morphology shows up as segments that belong to more
//! than one cognate set. [`segment_cognatesets`] maps every segment of every
//! form to the cognate sets that claim it, [`merge_candidates`] finds the
//! pairs of cognate sets that share a large part of their segments, and
//! [`cluster`] groups those pairs into connected components.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use log::{debug, info, warn};
use petgraph::unionfind::UnionFind;

use lexcell_core::SegmentSlice;

use crate::wordlist::Wordlist;

/// For each form, the cognate sets claiming each of its segments.
pub type SegmentMap = IndexMap<String, Vec<BTreeSet<String>>>;

/// Map every segment of every non-elided form to the cognate sets that
/// claim it.
///
/// Judgements referring to unknown or elided forms are ignored, judgements
/// with unusable slices are logged and skipped.
pub fn segment_cognatesets(wordlist: &Wordlist) -> SegmentMap {
    let mut map: SegmentMap = wordlist
        .forms
        .iter()
        .filter(|form| !form.is_elided())
        .map(|form| (form.id.clone(), vec![BTreeSet::new(); form.segment_count()]))
        .collect();

    for judgement in &wordlist.judgements {
        let Some(claims) = map.get_mut(&judgement.form_id) else {
            continue;
        };
        let slice = match SegmentSlice::parse_within(&judgement.segment_slice, claims.len()) {
            Ok(slice) => slice,
            Err(err) => {
                warn!(judgement = judgement.id.as_str(); "Skipping judgement: {err}");
                continue;
            }
        };
        if !slice.is_consecutive() {
            warn!(
                judgement = judgement.id.as_str(), slice:% = slice;
                "The morpheme is non-contiguous"
            );
        }
        for index in slice.indices() {
            if let Some(sets) = claims.get_mut(index) {
                sets.insert(judgement.cognateset_id.clone());
            }
        }
    }
    map
}

/// Pairs of cognate sets that should probably be merged.
///
/// Two cognate sets are a candidate if, in some form, the segments they
/// share make up at least half of the segments of the smaller one. Each
/// pair is ordered, the smaller id first.
pub fn merge_candidates(map: &SegmentMap, wordlist: &Wordlist) -> BTreeSet<(String, String)> {
    let mut mergers = BTreeSet::new();

    for (form_id, claims) in map {
        if !claims.iter().any(|sets| sets.len() > 1) {
            continue;
        }
        warn!(form = form_id.as_str(); "Segments are associated with multiple cognate sets");

        let mut members: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
        for (index, sets) in claims.iter().enumerate() {
            for set in sets {
                members.entry(set.as_str()).or_default().insert(index);
            }
        }

        let sets: Vec<_> = members.iter().collect();
        for (position, (first, first_indices)) in sets.iter().enumerate() {
            for (second, second_indices) in &sets[position + 1..] {
                let shared: Vec<usize> = first_indices
                    .intersection(second_indices)
                    .copied()
                    .collect();
                if shared.is_empty() {
                    continue;
                }

                let segments = wordlist.form(form_id).map(|form| {
                    shared
                        .iter()
                        .filter_map(|i| form.segments.get(*i).map(String::as_str))
                        .collect::<Vec<_>>()
                        .join(" ")
                });
                info!(
                    form = form_id.as_str(),
                    slice:% = SegmentSlice::from_indices(shared.iter().copied()),
                    segments:? = segments;
                    "Segments are in both cognate sets {first} and {second}"
                );

                let smaller = first_indices.len().min(second_indices.len());
                if 2 * shared.len() >= smaller {
                    mergers.insert((first.to_string(), second.to_string()));
                }
            }
        }
    }

    debug!(candidates = mergers.len(); "Merge candidates collected");
    mergers
}

/// Group overlapping cognate sets into clusters.
///
/// Every cluster is a connected component of the graph whose edges are the
/// given pairs. Clusters are sorted internally and by their first member.
pub fn cluster<'a, I>(pairs: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    let mut nodes: IndexMap<&str, usize> = IndexMap::new();
    let mut edges = Vec::new();
    for (first, second) in pairs {
        let next = nodes.len();
        let a = *nodes.entry(first.as_str()).or_insert(next);
        let next = nodes.len();
        let b = *nodes.entry(second.as_str()).or_insert(next);
        edges.push((a, b));
    }

    let mut components = UnionFind::<usize>::new(nodes.len());
    for (a, b) in edges {
        components.union(a, b);
    }

    let mut clusters: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (name, index) in &nodes {
        clusters
            .entry(components.find(*index))
            .or_default()
            .push(name.to_string());
    }

    let mut clusters: Vec<Vec<String>> = clusters
        .into_values()
        .map(|mut members| {
            members.sort();
            members
        })
        .collect();
    clusters.sort();
    clusters
}
