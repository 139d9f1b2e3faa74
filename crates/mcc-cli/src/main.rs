//! Metadata Compliance Checker CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use mcc_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_suites};

/// Exit code when every check ran and at least one failed.
const EXIT_CHECKS_FAILED: i32 = 1;
/// Exit code when the checker itself could not complete.
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_ERROR);
    }
    let exit_code = match &cli.command {
        Command::Check(args) => match run_check(args) {
            Ok(outcome) => {
                if outcome.has_failures() {
                    EXIT_CHECKS_FAILED
                } else {
                    0
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                EXIT_ERROR
            }
        },
        Command::Suites(args) => match run_suites(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                EXIT_ERROR
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level(level)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_timestamps(cli.log_timestamps)
        .with_ansi(with_ansi)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
}
