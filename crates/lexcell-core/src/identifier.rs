//! Identifier normalisation and allocation.
//!
//! This module provides [`string_to_id`], which turns arbitrary labels
//! (language names, source keys, concept glosses) into restricted
//! `[a-z0-9_]` identifiers, and [`IdRegistry`], which hands out identifiers
//! that are unique within one import run.

use std::collections::HashSet;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Generate an identifier from an arbitrary string.
///
/// The string is lower-cased, decomposed, stripped of combining marks, and
/// every run of characters outside `[a-z0-9_]` is collapsed into a single
/// `_`. Leading and trailing separators are dropped.
///
/// # Examples
///
/// ```
/// use lexcell_core::identifier::string_to_id;
///
/// assert_eq!(string_to_id("trivial"), "trivial");
/// assert_eq!(
///     string_to_id("Just 4 non-alphanumerical characters."),
///     "just_4_non_alphanumerical_characters"
/// );
/// assert_eq!(string_to_id("Aché"), "ache");
/// ```
pub fn string_to_id(text: &str) -> String {
    // Lower-casing twice: decomposition can surface upper-case base letters.
    let folded: String = text
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Registry of identifiers already in use.
///
/// One registry is constructed per import or completion run and passed to
/// every component that needs fresh identifiers, so numbering is
/// deterministic and never leaks between runs.
///
/// # Examples
///
/// ```
/// use lexcell_core::identifier::IdRegistry;
///
/// let mut registry = IdRegistry::with_ids(["ache_one"]);
/// assert_eq!(registry.allocate("ache_one"), "ache_one_2");
/// assert_eq!(registry.allocate("ache_two"), "ache_two");
/// assert_eq!(registry.allocate_numbered("X_f1"), "X_f1_1");
/// assert_eq!(registry.allocate_numbered("X_f1"), "X_f1_2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    seen: HashSet<String>,
}

impl IdRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with identifiers that already exist.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether an identifier is already taken.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Mark an identifier as taken. Returns `false` if it was taken before.
    pub fn reserve(&mut self, id: impl Into<String>) -> bool {
        self.seen.insert(id.into())
    }

    /// Number of identifiers taken so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check whether no identifier has been taken yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Allocate `candidate` itself if it is free, otherwise the first free
    /// `candidate_<n>` for `n >= 2`.
    pub fn allocate(&mut self, candidate: &str) -> String {
        if self.reserve(candidate) {
            return candidate.to_string();
        }
        self.first_free(candidate, 2)
    }

    /// Allocate the first free `prefix_<n>` for `n >= 1`.
    ///
    /// Unlike [`IdRegistry::allocate`], the bare prefix is never handed out.
    pub fn allocate_numbered(&mut self, prefix: &str) -> String {
        self.first_free(prefix, 1)
    }

    fn first_free(&mut self, prefix: &str, start: usize) -> String {
        let mut n = start;
        loop {
            let id = format!("{prefix}_{n}");
            if self.reserve(id.as_str()) {
                return id;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_id_collapses_punctuation() {
        assert_eq!(string_to_id("Paraguayan Guaraní"), "paraguayan_guarani");
        assert_eq!(string_to_id("  --hello,  world--  "), "hello_world");
        assert_eq!(string_to_id("abui_s{1}"), "abui_s_1");
    }

    #[test]
    fn test_string_to_id_keeps_underscores() {
        assert_eq!(string_to_id("ache_s4"), "ache_s4");
    }

    #[test]
    fn test_string_to_id_empty() {
        assert_eq!(string_to_id(""), "");
        assert_eq!(string_to_id("..."), "");
    }

    #[test]
    fn test_registry_allocate_free_candidate() {
        let mut registry = IdRegistry::new();
        assert_eq!(registry.allocate("f1"), "f1");
        assert!(registry.contains("f1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_allocate_taken_candidate() {
        let mut registry = IdRegistry::with_ids(["f1", "f1_2"]);
        assert_eq!(registry.allocate("f1"), "f1_3");
    }

    #[test]
    fn test_registry_numbered_skips_taken() {
        let mut registry = IdRegistry::with_ids(["X_f1_1"]);
        assert_eq!(registry.allocate_numbered("X_f1"), "X_f1_2");
        assert_eq!(registry.allocate_numbered("X_f2"), "X_f2_1");
    }
}
