//! CLI argument definitions for the metadata convention checker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mcc_standards::Selection;

#[derive(Parser)]
#[command(
    name = "mcc",
    version,
    about = "Metadata Compliance Checker - Check dataset metadata against conventions",
    long_about = "Check the global and variable attributes of a dataset against metadata\n\
                  conventions such as ACDD and GDS2.\n\n\
                  Datasets are read from a JSON description of their groups, variables\n\
                  and attributes. Conventions are loaded from TOML catalogs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix pretty and compact log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a dataset against one or more conventions.
    Check(CheckArgs),

    /// List the available conventions and their versions.
    Suites(SuitesArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the dataset description (JSON).
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Convention to check, as SHORT or SHORT=VERSION (repeatable).
    ///
    /// Every available convention at its default version runs when omitted.
    #[arg(long = "suite", short = 's', value_name = "SUITE")]
    pub suites: Vec<Selection>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormatArg,

    /// Write the report to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub standards: StandardsArgs,
}

#[derive(Parser)]
pub struct SuitesArgs {
    #[command(flatten)]
    pub standards: StandardsArgs,
}

#[derive(Parser)]
pub struct StandardsArgs {
    /// Directory holding the convention catalogs (default: $MCC_STANDARDS_DIR).
    #[arg(long = "standards-dir", value_name = "DIR")]
    pub standards_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
