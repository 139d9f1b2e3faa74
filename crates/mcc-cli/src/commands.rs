use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use comfy_table::Table;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use mcc_cli::pipeline::{CheckOutcome, check_dataset, default_selections, load_standards};
use mcc_cli::summary::{print_summary, render_summary};
use mcc_engine::SuiteDefinition;
use mcc_model::Dataset;
use tracing::info;

use crate::cli::{CheckArgs, ReportFormatArg, SuitesArgs};

pub fn run_check(args: &CheckArgs) -> Result<CheckOutcome> {
    let standards = load_standards(args.standards.standards_dir.as_deref())?;
    let dataset = Dataset::from_path(&args.dataset)
        .with_context(|| format!("failed to read dataset {}", args.dataset.display()))?;
    let selections = if args.suites.is_empty() {
        default_selections(&standards)
    } else {
        args.suites.clone()
    };

    let file = args
        .dataset
        .file_name()
        .map_or_else(|| args.dataset.display().to_string(), |name| name.to_string_lossy().into_owned());
    let outcome = check_dataset(&dataset, &file, &standards, &selections)?;
    info!(
        passed = outcome.passed(),
        total = outcome.total(),
        suites = outcome.results.len(),
        "check completed"
    );

    match (&args.output, args.format) {
        (None, ReportFormatArg::Text) => print_summary(&outcome),
        (None, ReportFormatArg::Json) => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &outcome).context("failed to write report")?;
            writeln!(stdout)?;
        }
        (Some(path), format) => {
            let rendered = match format {
                ReportFormatArg::Text => render_summary(&outcome, false),
                ReportFormatArg::Json => serde_json::to_string_pretty(&outcome)?,
            };
            fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report: {}", path.display());
        }
    }
    Ok(outcome)
}

pub fn run_suites(args: &SuitesArgs) -> Result<()> {
    let standards = load_standards(args.standards.standards_dir.as_deref())?;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Suite", "Name", "Versions", "Default"]);
    for suite in standards.iter() {
        table.add_row(vec![
            suite.short_name().to_string(),
            suite.catalog().about.name.clone(),
            suite.versions().join(", "),
            suite.default_version().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
