//! Command-line argument definitions for the Lexcell CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the curation step; the global
//! arguments control configuration file selection and logging verbosity.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Lexcell curation tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// The curation step to run.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse spreadsheet cells into form records
    Parse {
        /// JSON file holding a list of cells
        #[arg(help = "Path to the input cells file")]
        input: String,

        /// Path to the output JSON file
        #[arg(short, long, default_value = "forms.json")]
        output: String,

        /// Fail on the first cell with an element that cannot be parsed
        #[arg(long)]
        strict: bool,
    },

    /// Validate the cognate judgements of a wordlist
    Check {
        /// Wordlist JSON file
        #[arg(help = "Path to the input wordlist file")]
        input: String,

        /// Treat overlaps as errors and flag discontinuous slices
        #[arg(long)]
        strict: bool,

        /// Write a summary with overlap clusters to this JSON file
        #[arg(long)]
        clusters: Option<String>,
    },

    /// Add singleton cognate sets for uncovered segments
    Singletons {
        /// Wordlist JSON file
        #[arg(help = "Path to the input wordlist file")]
        input: String,

        /// Path to the completed wordlist
        #[arg(short, long, default_value = "wordlist.json")]
        output: String,
    },
}
