//! Configuration types for lexcell curation runs.
//!
//! This module provides configuration structures that control how cells are
//! parsed, how strictly cognate judgements are validated, and how singleton
//! cognate sets are synthesized. All types implement [`serde::Deserialize`]
//! for loading from a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ParserConfig`] - Cell conventions, the `[parser]` section.
//! - [`ValidationPolicy`] - Validator strictness, the `[validation]` section.
//! - [`SingletonConfig`] - Singleton synthesis, the `[singletons]` section.
//!
//! # Example
//!
//! ```
//! # use lexcell::config::{AppConfig, SingletonMode};
//! let config = AppConfig::default();
//! assert!(!config.validation().strict());
//! assert_eq!(config.singletons().mode(), SingletonMode::BySegment);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

pub use lexcell_parser::ParserConfig;

use crate::LexcellError;

/// Top-level configuration combining parser, validation and singleton settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Cell conventions section.
    #[serde(default)]
    parser: ParserConfig,

    /// Validation policy section.
    #[serde(default)]
    validation: ValidationPolicy,

    /// Singleton synthesis section.
    #[serde(default)]
    singletons: SingletonConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        parser: ParserConfig,
        validation: ValidationPolicy,
        singletons: SingletonConfig,
    ) -> Self {
        Self {
            parser,
            validation,
            singletons,
        }
    }

    /// Returns the cell parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the validation policy.
    pub fn validation(&self) -> &ValidationPolicy {
        &self.validation
    }

    /// Returns the singleton configuration.
    pub fn singletons(&self) -> &SingletonConfig {
        &self.singletons
    }

    /// Replace the validation policy.
    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    /// Check the configuration for conflicting settings.
    ///
    /// # Errors
    ///
    /// Returns [`LexcellError::Config`] describing the first conflict.
    pub fn validate(&self) -> Result<(), LexcellError> {
        self.parser.validate().map_err(LexcellError::Config)
    }
}

/// How strictly cognate judgements are checked.
///
/// The default policy reports overlapping judgements of different cognate
/// sets as warnings and tolerates discontinuous slices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Escalate overlaps to errors and flag discontinuous slices.
    strict: bool,

    /// Accept segments claimed by several cognate sets without a finding.
    allow_nonconcatenative: bool,

    /// Report segment runs that no judgement covers.
    report_uncovered: bool,
}

impl ValidationPolicy {
    pub fn new(strict: bool, allow_nonconcatenative: bool, report_uncovered: bool) -> Self {
        Self {
            strict,
            allow_nonconcatenative,
            report_uncovered,
        }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn allow_nonconcatenative(&self) -> bool {
        self.allow_nonconcatenative
    }

    pub fn report_uncovered(&self) -> bool {
        self.report_uncovered
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_allow_nonconcatenative(mut self, allow: bool) -> Self {
        self.allow_nonconcatenative = allow;
        self
    }

    pub fn with_report_uncovered(mut self, report: bool) -> Self {
        self.report_uncovered = report;
        self
    }
}

/// Which forms receive singleton cognate sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingletonMode {
    /// One singleton per run of segments no judgement covers.
    #[default]
    BySegment,

    /// One singleton per form that has no judgement at all.
    WholeForm,
}

/// Settings for singleton cognate set synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SingletonConfig {
    mode: SingletonMode,

    /// Status recorded on every synthesized cognate set.
    status: Option<String>,
}

impl Default for SingletonConfig {
    fn default() -> Self {
        Self {
            mode: SingletonMode::default(),
            status: Some("automatic singleton".to_string()),
        }
    }
}

impl SingletonConfig {
    pub fn new(mode: SingletonMode, status: Option<&str>) -> Self {
        Self {
            mode,
            status: status.map(str::to_string),
        }
    }

    pub fn mode(&self) -> SingletonMode {
        self.mode
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
