//! Bracket matching over cell text.
//!
//! The single-pair helpers [`is_balanced`] and [`counts_match`] answer
//! simple questions about one delimiter pair. [`check_brackets`] and
//! [`components`] work over every configured pair at once, with a stack of
//! expected closing delimiters, symmetric pairs such as `/…/`, and an escape
//! character that makes the following delimiter literal.

use thiserror::Error;

use crate::span::Span;

/// A delimiter that does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BracketError {
    #[error("unexpected closing `{found}`")]
    UnexpectedClose { found: char, offset: usize },

    #[error("`{open}` is never closed by `{close}`")]
    Unclosed {
        open: char,
        close: char,
        offset: usize,
    },
}

impl BracketError {
    /// Byte offset of the offending delimiter.
    pub fn offset(&self) -> usize {
        match self {
            BracketError::UnexpectedClose { offset, .. } | BracketError::Unclosed { offset, .. } => {
                *offset
            }
        }
    }

    /// The delimiter that was found unexpectedly, or the one that is missing.
    pub fn delimiter(&self) -> char {
        match self {
            BracketError::UnexpectedClose { found, .. } => *found,
            BracketError::Unclosed { close, .. } => *close,
        }
    }

    /// Span of the offending delimiter.
    pub fn span(&self) -> Span {
        let width = match self {
            BracketError::UnexpectedClose { found, .. } => found.len_utf8(),
            BracketError::Unclosed { open, .. } => open.len_utf8(),
        };
        Span::new(self.offset()..self.offset() + width)
    }
}

/// Check nesting of a single delimiter pair.
///
/// Returns `true` iff the depth never drops below zero and ends at zero.
/// For a symmetric pair (`open == close`) every occurrence toggles, so the
/// count must be even.
///
/// # Examples
///
/// ```
/// use lexcell_parser::bracket::is_balanced;
///
/// assert!(is_balanced("(a (b) c)", '(', ')'));
/// assert!(!is_balanced(")(", '(', ')'));
/// assert!(is_balanced("/a/ /b/", '/', '/'));
/// ```
pub fn is_balanced(text: &str, open: char, close: char) -> bool {
    if open == close {
        return text.chars().filter(|c| *c == open).count() % 2 == 0;
    }
    let mut depth = 0usize;
    for c in text.chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return false;
            }
            depth -= 1;
        }
    }
    depth == 0
}

/// Check only that two characters occur equally often.
pub fn counts_match(text: &str, open: char, close: char) -> bool {
    let opens = text.chars().filter(|c| *c == open).count();
    let closes = text.chars().filter(|c| *c == close).count();
    opens == closes
}

/// Check all delimiter pairs at once.
///
/// # Examples
///
/// ```
/// use lexcell_parser::bracket::check_brackets;
///
/// let pairs = [('(', ')'), ('[', ']')];
/// assert!(check_brackets("This (but [not] this)", &pairs, Some('!')));
/// assert!(!check_brackets("(te[xt)]", &pairs, Some('!')));
/// assert!(check_brackets("!(te[xt!)]", &pairs, Some('!')));
/// ```
pub fn check_brackets(text: &str, pairs: &[(char, char)], escape: Option<char>) -> bool {
    check(text, pairs, escape).is_ok()
}

/// Like [`check_brackets`], but reports the first mismatch.
///
/// # Errors
///
/// Returns a [`BracketError`] at the first closing delimiter that does not
/// match, or at the innermost delimiter left open.
pub fn check(text: &str, pairs: &[(char, char)], escape: Option<char>) -> Result<(), BracketError> {
    let mut tracker = Tracker::new(pairs, escape);
    for (offset, ch) in text.char_indices() {
        tracker.step(offset, ch)?;
    }
    tracker.finish()
}

/// A top-level piece of an element: a complete bracketed group, or the
/// bare text between groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component<'src> {
    text: &'src str,
    span: Span,
    open: Option<char>,
}

impl<'src> Component<'src> {
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Span relative to the text passed to [`components`].
    pub fn span(&self) -> Span {
        self.span
    }

    /// The opening delimiter of a bracketed group, `None` for bare text.
    pub fn open(&self) -> Option<char> {
        self.open
    }

    pub fn is_bracketed(&self) -> bool {
        self.open.is_some()
    }

    /// Text inside the outer delimiters; bare text is returned unchanged.
    pub fn interior(&self) -> &'src str {
        match self.open {
            Some(open) => {
                let inner = &self.text[open.len_utf8()..];
                let mut chars = inner.chars();
                chars.next_back();
                chars.as_str()
            }
            None => self.text,
        }
    }
}

/// Split text into top-level bracketed groups and the bare text around them.
///
/// # Errors
///
/// Returns a [`BracketError`] if the delimiters do not match.
///
/// # Examples
///
/// ```
/// use lexcell_parser::bracket::components;
///
/// let pairs = [('/', '/'), ('(', ')')];
/// let parts = components("/aha/ (exclam. !/ int., also /ah/)", &pairs, Some('!')).unwrap();
/// let texts: Vec<_> = parts.iter().map(|c| c.text()).collect();
/// assert_eq!(texts, vec!["/aha/", " ", "(exclam. !/ int., also /ah/)"]);
/// ```
pub fn components<'src>(
    text: &'src str,
    pairs: &[(char, char)],
    escape: Option<char>,
) -> Result<Vec<Component<'src>>, BracketError> {
    let mut tracker = Tracker::new(pairs, escape);
    let mut parts = Vec::new();
    let mut start = 0;

    for (offset, ch) in text.char_indices() {
        let was_level = tracker.depth() == 0;
        match tracker.step(offset, ch)? {
            Step::Open if was_level => {
                if start < offset {
                    parts.push(Component {
                        text: &text[start..offset],
                        span: Span::new(start..offset),
                        open: None,
                    });
                }
                start = offset;
            }
            Step::Close if tracker.depth() == 0 => {
                let end = offset + ch.len_utf8();
                parts.push(Component {
                    text: &text[start..end],
                    span: Span::new(start..end),
                    open: text[start..].chars().next(),
                });
                start = end;
            }
            _ => {}
        }
    }
    tracker.finish()?;

    if start < text.len() {
        parts.push(Component {
            text: &text[start..],
            span: Span::new(start..text.len()),
            open: None,
        });
    }
    Ok(parts)
}

/// What a single character did to the bracket state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// An ordinary character.
    Text,
    /// The escape character itself.
    Escape,
    /// An escaped delimiter, taken literally.
    Literal,
    Open,
    Close,
}

/// Incremental bracket state shared by the matcher, the splitter and the
/// component scanner.
#[derive(Debug)]
pub(crate) struct Tracker<'a> {
    pairs: &'a [(char, char)],
    escape: Option<char>,
    /// `(open, close, offset)` of every group still open, innermost last.
    stack: Vec<(char, char, usize)>,
    escaped: bool,
}

impl<'a> Tracker<'a> {
    pub(crate) fn new(pairs: &'a [(char, char)], escape: Option<char>) -> Self {
        Self {
            pairs,
            escape,
            stack: Vec::new(),
            escaped: false,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn step(&mut self, offset: usize, ch: char) -> Result<Step, BracketError> {
        if self.escaped {
            self.escaped = false;
            if self.is_delimiter(ch) {
                return Ok(Step::Literal);
            }
        }
        if Some(ch) == self.escape {
            self.escaped = true;
            return Ok(Step::Escape);
        }
        if self.stack.last().is_some_and(|&(_, close, _)| close == ch) {
            self.stack.pop();
            return Ok(Step::Close);
        }
        if let Some(&(open, close)) = self.pairs.iter().find(|(open, _)| *open == ch) {
            self.stack.push((open, close, offset));
            return Ok(Step::Open);
        }
        if self.pairs.iter().any(|(_, close)| *close == ch) {
            return Err(BracketError::UnexpectedClose { found: ch, offset });
        }
        Ok(Step::Text)
    }

    pub(crate) fn finish(&self) -> Result<(), BracketError> {
        match self.stack.last() {
            Some(&(open, close, offset)) => Err(BracketError::Unclosed {
                open,
                close,
                offset,
            }),
            None => Ok(()),
        }
    }

    fn is_delimiter(&self, ch: char) -> bool {
        self.pairs
            .iter()
            .any(|(open, close)| *open == ch || *close == ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: [(char, char); 5] = [('/', '/'), ('[', ']'), ('<', '>'), ('(', ')'), ('{', '}')];

    #[test]
    fn test_is_balanced_simple() {
        assert!(is_balanced("([])", '(', ')'));
        assert!(!is_balanced("(()", '(', ')'));
        assert!(!is_balanced("())(", '(', ')'));
        assert!(is_balanced("", '(', ')'));
    }

    #[test]
    fn test_counts_match_ignores_order() {
        assert!(counts_match(")(", '(', ')'));
        assert!(!counts_match("(()", '(', ')'));
    }

    #[test]
    fn test_check_brackets_nesting() {
        let pairs = [('(', ')'), ('[', ']'), ('{', '}')];
        assert!(check_brackets("([])", &pairs, None));
        assert!(!check_brackets("([]])", &pairs, None));
        assert!(!check_brackets("([[])", &pairs, None));
    }

    #[test]
    fn test_check_brackets_escape() {
        let pairs = [('(', ')'), ('[', ']')];
        assert!(check_brackets("(text)", &pairs, Some('!')));
        assert!(!check_brackets("(text", &pairs, Some('!')));
        assert!(!check_brackets("text)", &pairs, Some('!')));
        assert!(check_brackets("!(text", &pairs, Some('!')));
        assert!(check_brackets("text!)", &pairs, Some('!')));
    }

    #[test]
    fn test_check_reports_unclosed() {
        let err = check("(GIVE BIRTH) [mbohaˈpɨ", &PAIRS, Some('!')).unwrap_err();
        assert_eq!(
            err,
            BracketError::Unclosed {
                open: '[',
                close: ']',
                offset: 13
            }
        );
        assert_eq!(err.delimiter(), ']');
        assert_eq!(err.span(), Span::new(13..14));
    }

    #[test]
    fn test_check_reports_unexpected_close() {
        let text = "<eniãcũpũ> (good-tasting (sweet honey, water))){2}";
        let err = check(text, &PAIRS, Some('!')).unwrap_err();
        assert!(matches!(err, BracketError::UnexpectedClose { found: ')', .. }));
        assert_eq!(&text[err.offset()..err.offset() + 1], ")");
    }

    #[test]
    fn test_components_mixed() {
        let parts = components("[iɾũndɨ] (H.F.) (parir)", &PAIRS, Some('!')).unwrap();
        let texts: Vec<_> = parts.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["[iɾũndɨ]", " ", "(H.F.)", " ", "(parir)"]);
        assert_eq!(parts[0].interior(), "iɾũndɨ");
        assert_eq!(parts[0].open(), Some('['));
        assert!(!parts[1].is_bracketed());
    }

    #[test]
    fn test_components_keeps_nested_groups() {
        let parts = components("(a (b) c){1}", &PAIRS, None).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].interior(), "a (b) c");
        assert_eq!(parts[1].span(), Span::new(9..12));
    }

    #[test]
    fn test_components_unclosed() {
        assert!(components("/aha (exclam.)", &PAIRS, Some('!')).is_err());
    }
}
