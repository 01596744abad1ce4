//! CLI logic for the Lexcell curation tool.
//!
//! This module contains the core CLI logic for the Lexcell curation tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::fs;

use log::{info, warn};
use miette::GraphicalReportHandler;
use serde::Serialize;

use lexcell::{
    Curator, LexcellError, SheetCell, Wordlist, config::AppConfig, validate::ValidationReport,
};

use error_adapter::{Reportable, cell_reportables, warning_reportables};

/// Summary written by `check --clusters`.
#[derive(Debug, Serialize)]
struct CheckSummary {
    errors: usize,
    warnings: usize,
    findings: Vec<String>,
    clusters: Vec<Vec<String>>,
}

/// Run the Lexcell CLI application
///
/// This function loads the configuration and dispatches to the selected
/// subcommand.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `LexcellError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed JSON input
/// - Validation errors
pub fn run(args: &Args) -> Result<(), LexcellError> {
    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Parse {
            input,
            output,
            strict,
        } => parse_cells(app_config, input, output, *strict),
        Command::Check {
            input,
            strict,
            clusters,
        } => {
            let mut app_config = app_config;
            if *strict {
                let policy = app_config.validation().with_strict(true);
                app_config = app_config.with_validation(policy);
            }
            check_wordlist(app_config, input, clusters.as_deref())
        }
        Command::Singletons { input, output } => add_singletons(app_config, input, output),
    }
}

fn parse_cells(
    app_config: AppConfig,
    input: &str,
    output: &str,
    strict: bool,
) -> Result<(), LexcellError> {
    info!(input_path = input, output_path = output, strict; "Parsing cells");

    let cells: Vec<SheetCell> = serde_json::from_str(&fs::read_to_string(input)?)?;

    let curator = Curator::new(app_config);
    let parsed = curator.parse_sheet(&cells);

    if strict {
        parsed
            .iter()
            .cloned()
            .try_for_each(|cell| cell.into_result().map(drop))?;
    }

    // Problems in single cells never stop the sheet
    for cell in &parsed {
        log_reportables(&cell_reportables(cell));
    }

    fs::write(output, serde_json::to_string_pretty(&parsed)?)?;

    info!(output_file = output; "Forms exported successfully");
    Ok(())
}

fn check_wordlist(
    app_config: AppConfig,
    input: &str,
    clusters_path: Option<&str>,
) -> Result<(), LexcellError> {
    info!(input_path = input; "Checking cognate judgements");

    let wordlist = Wordlist::from_json(&fs::read_to_string(input)?)?;
    let curator = Curator::new(app_config);
    let report = curator.validate(&wordlist);

    log_reportables(&warning_reportables(&report));

    if let Some(path) = clusters_path {
        let summary = summarize(&report, curator.overlap_clusters(&wordlist));
        fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!(output_file = path; "Summary exported successfully");
    }

    if report.has_errors() {
        return Err(LexcellError::Validation(report));
    }

    info!(warnings = report.warnings().count(); "Cognate judgements are valid");
    Ok(())
}

fn add_singletons(app_config: AppConfig, input: &str, output: &str) -> Result<(), LexcellError> {
    info!(input_path = input, output_path = output; "Adding singleton cognate sets");

    let mut wordlist = Wordlist::from_json(&fs::read_to_string(input)?)?;
    let created = Curator::new(app_config).complete_singletons(&mut wordlist);

    fs::write(output, wordlist.to_json()?)?;

    info!(created, output_file = output; "Wordlist exported successfully");
    Ok(())
}

fn summarize(report: &ValidationReport, clusters: Vec<Vec<String>>) -> CheckSummary {
    CheckSummary {
        errors: report.error_count(),
        warnings: report.warnings().count(),
        findings: report.findings().iter().map(ToString::to_string).collect(),
        clusters,
    }
}

/// Render reportables and log them as warnings.
fn log_reportables(reportables: &[Reportable<'_>]) {
    let reporter = GraphicalReportHandler::new();
    for reportable in reportables {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, reportable).is_ok() {
            warn!("{writer}");
        }
    }
}
