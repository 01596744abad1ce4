//! Source references of parsed forms.
//!
//! A source field such as `{Gul2020: p. 4}` names a source key and an
//! optional context, usually a page. Keys are local to a language column in
//! the spreadsheet, so the resolved identifier is namespaced by language:
//! `{1}` in the `abui` column becomes `abui_s1`. An empty source such as
//! `{}` cites the configured default key, just like an element without a
//! source.

use std::fmt;

use serde::Serialize;

use lexcell_core::identifier::string_to_id;

use crate::{
    config::{Field, ParserConfig},
    error::{Diagnostic, ErrorCode},
    variant::interior,
};

/// A resolved source identifier with optional context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceRef {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl SourceRef {
    pub fn new(id: impl Into<String>, context: Option<String>) -> Self {
        Self {
            id: id.into(),
            context,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{}[{}]", self.id, context),
            None => write!(f, "{}", self.id),
        }
    }
}

/// The outcome of resolving one source field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// `None` for an empty source when no default key is configured.
    pub source: Option<SourceRef>,
    /// Set when the split into key and context may be wrong.
    pub warning: Option<Diagnostic>,
}

/// Resolves source field text into [`SourceRef`]s.
#[derive(Debug)]
pub struct SourceResolver<'a> {
    config: &'a ParserConfig,
    open: char,
    close: char,
}

impl<'a> SourceResolver<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        let (open, close) = config
            .spec_for(Field::Source)
            .map(|spec| (spec.open(), spec.close()))
            .unwrap_or(('{', '}'));
        Self {
            config,
            open,
            close,
        }
    }

    /// Resolve source field text, with or without its delimiters.
    ///
    /// The text is split once at the first `:` into key and context. If the
    /// text starts with the opening delimiter but the closing one is
    /// missing, the split is still made and a warning is returned. An
    /// empty key is replaced by the default key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcell_parser::{ParserConfig, source::SourceResolver};
    ///
    /// let config = ParserConfig::default();
    /// let resolver = SourceResolver::new(&config);
    /// let id = |raw: &str| resolver.resolve(raw, Some("abui")).source.map(|s| s.to_string());
    /// assert_eq!(id("{1}").as_deref(), Some("abui_s1"));
    /// assert_eq!(id("{}").as_deref(), Some("abui_s1"));
    /// assert_eq!(id("{Gul2020: p. 4}").as_deref(), Some("abui_sgul2020[p. 4]"));
    /// ```
    pub fn resolve(&self, raw: &str, language_id: Option<&str>) -> Resolved {
        let text = raw.trim();
        let opened = text.starts_with(self.open);
        let text = text.strip_prefix(self.open).unwrap_or(text);

        let mut warning = None;
        let (key, context) = match text.split_once(':') {
            Some((key, context)) => {
                let context = match context.strip_suffix(self.close) {
                    Some(context) => context,
                    None => {
                        if opened {
                            warning = Some(
                                Diagnostic::warning(format!(
                                    "closing `{}` is missing in source `{raw}`, split into source and context may be wrong",
                                    self.close
                                ))
                                .with_code(ErrorCode::E106),
                            );
                        }
                        context
                    }
                };
                (key, clean_context(context))
            }
            None => (interior(text, self.open, self.close), None),
        };

        let key = match key.trim() {
            "" => self.config.default_source(),
            key => Some(key),
        };
        Resolved {
            source: key.map(|key| SourceRef::new(source_id(key, language_id), context)),
            warning,
        }
    }

    /// The source used for elements that cite none, if configured.
    pub fn default_source(&self, language_id: Option<&str>) -> Option<SourceRef> {
        self.config
            .default_source()
            .map(|key| SourceRef::new(source_id(key, language_id), None))
    }
}

fn source_id(key: &str, language_id: Option<&str>) -> String {
    let id = match language_id {
        Some(language) => string_to_id(&format!("{language}_s{key}")),
        None => string_to_id(key),
    };
    id.replace([':', ','], "")
}

fn clean_context(context: &str) -> Option<String> {
    let context = context.trim().replace([':', ','], "");
    let context = context.trim();
    (!context.is_empty()).then(|| context.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str, language: Option<&str>) -> Resolved {
        let config = ParserConfig::default();
        SourceResolver::new(&config).resolve(raw, language)
    }

    fn source(resolved: &Resolved) -> &SourceRef {
        resolved.source.as_ref().expect("Expected a source")
    }

    #[test]
    fn test_resolve_numbered_source() {
        let resolved = resolve("{4}", Some("ache"));
        assert_eq!(resolved.source, Some(SourceRef::new("ache_s4", None)));
        assert!(resolved.warning.is_none());
    }

    #[test]
    fn test_resolve_empty_source_uses_default_key() {
        assert_eq!(source(&resolve("", Some("abui"))).id(), "abui_s1");
        assert_eq!(source(&resolve("{}", Some("abui"))).id(), "abui_s1");
        assert_eq!(source(&resolve("{ }", None)).id(), "1");

        let resolved = resolve("{: p. 4}", Some("abui"));
        assert_eq!(source(&resolved).to_string(), "abui_s1[p. 4]");
    }

    #[test]
    fn test_resolve_empty_source_without_default() {
        let config = ParserConfig::default().with_default_source(None);
        let resolved = SourceResolver::new(&config).resolve("{}", Some("abui"));
        assert_eq!(resolved.source, None);
        assert!(resolved.warning.is_none());
    }

    #[test]
    fn test_resolve_with_context() {
        let resolved = resolve("{Gul2020: p. 4}", Some("abui"));
        let source = source(&resolved);
        assert_eq!(source.id(), "abui_sgul2020");
        assert_eq!(source.context(), Some("p. 4"));
        assert_eq!(source.to_string(), "abui_sgul2020[p. 4]");
    }

    #[test]
    fn test_resolve_strips_colons_and_commas_from_context() {
        let resolved = resolve("{Gul2020: pp. 4, 7: note}", Some("abui"));
        assert_eq!(source(&resolved).context(), Some("pp. 4 7 note"));
    }

    #[test]
    fn test_resolve_missing_close_warns() {
        let resolved = resolve("{Gul2020: p. 4", Some("abui"));
        assert_eq!(source(&resolved).to_string(), "abui_sgul2020[p. 4]");
        let warning = resolved.warning.unwrap();
        assert_eq!(warning.code(), Some(ErrorCode::E106));
        assert!(warning.severity().is_warning());
    }

    #[test]
    fn test_resolve_without_delimiters_or_language() {
        let resolved = resolve("Gul2020: p. 4", None);
        assert_eq!(source(&resolved).id(), "gul2020");
        assert!(resolved.warning.is_none());
    }

    #[test]
    fn test_default_source() {
        let config = ParserConfig::default();
        let resolver = SourceResolver::new(&config);
        assert_eq!(
            resolver.default_source(Some("abui")),
            Some(SourceRef::new("abui_s1", None))
        );

        let config = ParserConfig::default().with_default_source(None);
        assert_eq!(SourceResolver::new(&config).default_source(Some("abui")), None);
    }
}
