//! Variants written inside a single transcription field.
//!
//! Authors often record alternatives within one pair of delimiters, as in
//! `/lεksedata ~ lεksidata/` or `/a ~ b % c/`. [`scan_variants`] cuts the
//! field at every marker it finds inside the delimiters, whichever marker it
//! is, and delimits each alternative on its own.

/// A field value split into its canonical reading and variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedField {
    /// The first alternative, without delimiters.
    pub canonical: String,
    /// Later alternatives in the order they were written, each as marker,
    /// open delimiter, reading, close delimiter.
    pub variants: Vec<String>,
}

/// Split a delimited field value at any of `markers`.
///
/// `raw` is the field including its delimiters. Without a marker inside the
/// delimiters the interior is returned unchanged and no variant is produced.
///
/// # Examples
///
/// ```
/// use lexcell_parser::variant::scan_variants;
///
/// let scanned = scan_variants("/lεksedata ~ lεksidata/", &['~', '%'], '/', '/');
/// assert_eq!(scanned.canonical, "lεksedata");
/// assert_eq!(scanned.variants, vec!["~/lεksidata/"]);
/// ```
pub fn scan_variants(raw: &str, markers: &[char], open: char, close: char) -> ScannedField {
    let mut first = String::with_capacity(raw.len());
    let mut alternatives: Vec<(char, String)> = Vec::new();
    let mut inside = false;

    for ch in raw.chars() {
        if inside && markers.contains(&ch) {
            alternatives.push((ch, String::new()));
            continue;
        }
        if open == close {
            if ch == open {
                inside = !inside;
            }
        } else if ch == open {
            inside = true;
        } else if ch == close {
            inside = false;
        }
        match alternatives.last_mut() {
            Some((_, alternative)) => alternative.push(ch),
            None => first.push(ch),
        }
    }

    if alternatives.is_empty() {
        return ScannedField {
            canonical: interior(raw, open, close).to_string(),
            variants: Vec::new(),
        };
    }

    let variants = alternatives
        .iter()
        .filter_map(|(marker, alternative)| {
            let reading = interior(alternative, open, close).trim();
            (!reading.is_empty()).then(|| format!("{marker}{open}{reading}{close}"))
        })
        .collect();

    ScannedField {
        canonical: interior(&first, open, close).trim().to_string(),
        variants,
    }
}

/// Strip one pair of outer delimiters, tolerating either being absent.
pub(crate) fn interior(text: &str, open: char, close: char) -> &str {
    let text = text.trim();
    let text = text.strip_prefix(open).unwrap_or(text);
    text.strip_suffix(close).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_without_marker() {
        let scanned = scan_variants("[ta.'ʔa]", &['~'], '[', ']');
        assert_eq!(scanned.canonical, "ta.'ʔa");
        assert!(scanned.variants.is_empty());
    }

    #[test]
    fn test_scan_keeps_untrimmed_interior_without_marker() {
        let scanned = scan_variants("< a >", &['~'], '<', '>');
        assert_eq!(scanned.canonical, " a ");
    }

    #[test]
    fn test_scan_several_alternatives() {
        let scanned = scan_variants("[a ~ b ~c]", &['~'], '[', ']');
        assert_eq!(scanned.canonical, "a");
        assert_eq!(scanned.variants, vec!["~[b]", "~[c]"]);
    }

    #[test]
    fn test_scan_weak_marker() {
        let scanned = scan_variants("<kwa % kua>", &['~', '%'], '<', '>');
        assert_eq!(scanned.canonical, "kwa");
        assert_eq!(scanned.variants, vec!["%<kua>"]);
    }

    #[test]
    fn test_scan_ignores_other_marker() {
        let scanned = scan_variants("/a % b/", &['~'], '/', '/');
        assert_eq!(scanned.canonical, "a % b");
        assert!(scanned.variants.is_empty());
    }

    #[test]
    fn test_scan_mixed_markers_in_written_order() {
        let scanned = scan_variants("/a ~ b % c/", &['~', '%'], '/', '/');
        assert_eq!(scanned.canonical, "a");
        assert_eq!(scanned.variants, vec!["~/b/", "%/c/"]);

        let scanned = scan_variants("[a % b ~ c]", &['~', '%'], '[', ']');
        assert_eq!(scanned.canonical, "a");
        assert_eq!(scanned.variants, vec!["%[b]", "~[c]"]);
    }

    #[test]
    fn test_scan_drops_empty_alternative() {
        let scanned = scan_variants("/a ~ /", &['~'], '/', '/');
        assert_eq!(scanned.canonical, "a");
        assert!(scanned.variants.is_empty());
    }
}
