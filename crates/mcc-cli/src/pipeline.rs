//! Run the selected conventions over one dataset.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use mcc_checkers::builtin_registry;
use mcc_engine::{CheckResult, GroupReport, SuiteDefinition};
use mcc_model::Dataset;
use mcc_standards::{Selection, StandardsRegistry, standards_root};
use serde::Serialize;
use tracing::info;

/// Version stamped into every JSON report.
pub const MCC_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load the catalogs from `dir`, or from the default standards root.
pub fn load_standards(dir: Option<&Path>) -> Result<StandardsRegistry> {
    let dir = dir.map_or_else(standards_root, Path::to_path_buf);
    StandardsRegistry::load_dir(&dir, &builtin_registry())
        .with_context(|| format!("failed to load catalogs from {}", dir.display()))
}

/// Every loaded convention at its default version.
pub fn default_selections(standards: &StandardsRegistry) -> Vec<Selection> {
    standards
        .iter()
        .map(|suite| Selection::new(suite.short_name(), Some(suite.default_version().to_string())))
        .collect()
}

/// Outcome of checking one dataset, shaped as the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub mcc_version: &'static str,
    /// Short name to version, for every suite that ran.
    pub selected_suites: BTreeMap<String, String>,
    pub file: String,
    pub data_model: Option<String>,
    /// One report per suite, in selection order.
    pub results: Vec<GroupReport>,
}

impl CheckOutcome {
    pub fn passed(&self) -> usize {
        self.results.iter().map(|report| report.passed).sum()
    }

    pub fn total(&self) -> usize {
        self.results.iter().map(|report| report.total).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|report| !report.is_passed())
    }

    /// Failing leaf results of every suite, paired with the suite short name.
    pub fn failures(&self) -> Vec<(&str, &CheckResult)> {
        self.results
            .iter()
            .flat_map(|report| {
                let suite = report.attributes.short_name().unwrap_or("-");
                report
                    .leaf_results()
                    .into_iter()
                    .filter(|result| !result.is_passed())
                    .map(move |result| (suite, result))
            })
            .collect()
    }
}

/// Run every selection against `dataset`.
///
/// Fails on the first unknown suite, unsupported version or suite selected
/// twice, before any suite has run.
pub fn check_dataset(
    dataset: &Dataset,
    file: &str,
    standards: &StandardsRegistry,
    selections: &[Selection],
) -> Result<CheckOutcome> {
    let suites = selections
        .iter()
        .map(|selection| {
            standards
                .select(selection)
                .with_context(|| format!("cannot select suite {selection}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut selected_suites = BTreeMap::new();
    for suite in &suites {
        let version = suite.version().unwrap_or_default().to_string();
        if let Some(first) = selected_suites.insert(suite.short_name().to_string(), version) {
            bail!(
                "suite {} selected more than once (versions {first} and {})",
                suite.short_name(),
                suite.version().unwrap_or("-")
            );
        }
    }

    let mut results = Vec::with_capacity(suites.len());
    for suite in &suites {
        let start = Instant::now();
        let report = suite
            .run(dataset)
            .with_context(|| format!("suite {} failed to run", suite.short_name()))?;
        info!(
            suite = suite.short_name(),
            version = suite.version().unwrap_or("-"),
            elapsed = ?start.elapsed(),
            "checked dataset"
        );
        results.push(report);
    }

    Ok(CheckOutcome {
        mcc_version: MCC_VERSION,
        selected_suites,
        file: file.to_string(),
        data_model: dataset.data_model.clone(),
        results,
    })
}
