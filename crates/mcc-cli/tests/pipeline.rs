use std::fs;

use mcc_cli::pipeline::{MCC_VERSION, check_dataset, default_selections, load_standards};
use mcc_cli::summary::render_summary;
use mcc_model::Dataset;
use mcc_standards::{Selection, StandardsRegistry};
use tempfile::TempDir;

const EXAMPLE: &str = r#"
[about]
name = "Example Convention"
short_name = "EX"
description = "Example"
url = "https://example.org"
versions = ["1.0", "2.0"]
default_version = "2.0"

[[children]]
group = "Globals"
attributes = { scope = "globals", priority = "required" }
validators = ["existence"]

[[children.children]]
name = "title"

[[children.children]]
name = "summary"
"#;

fn standards() -> (TempDir, StandardsRegistry) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.toml"), EXAMPLE).unwrap();
    let registry = load_standards(Some(dir.path())).unwrap();
    (dir, registry)
}

fn dataset() -> Dataset {
    Dataset::new()
        .with_data_model("NETCDF4")
        .with_attribute("title", "Ocean")
}

#[test]
fn outcome_carries_envelope_fields() {
    let (_dir, standards) = standards();
    let selections = default_selections(&standards);
    assert_eq!(selections, vec![Selection::new("EX", Some("2.0".to_string()))]);

    let outcome = check_dataset(&dataset(), "ocean.json", &standards, &selections).unwrap();
    assert_eq!((outcome.passed(), outcome.total()), (1, 2));
    assert!(outcome.has_failures());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["mcc_version"], MCC_VERSION);
    assert_eq!(json["selected_suites"]["EX"], "2.0");
    assert_eq!(json["file"], "ocean.json");
    assert_eq!(json["data_model"], "NETCDF4");
    assert_eq!(json["results"][0]["name"], "Example Convention");
    assert_eq!(json["results"][0]["attributes"]["version"], "2.0");
}

#[test]
fn failures_list_only_failed_results() {
    let (_dir, standards) = standards();
    let selections = vec!["ex=1.0".parse().unwrap()];
    let outcome = check_dataset(&dataset(), "ocean.json", &standards, &selections).unwrap();

    let lines: Vec<String> = outcome
        .failures()
        .into_iter()
        .map(|(suite, result)| format!("{suite}: {result}"))
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r#"EX: check for existence failed because "summary" does not exist"#);
}

#[test]
fn unknown_suite_fails_before_running() {
    let (_dir, standards) = standards();
    let selections = vec![
        Selection::new("EX", None),
        Selection::new("CF", Some("1.6".to_string())),
    ];
    let err = check_dataset(&dataset(), "ocean.json", &standards, &selections).unwrap_err();
    assert!(format!("{err:#}").contains("CF=1.6"));
}

#[test]
fn suite_selected_twice_is_rejected() {
    let (_dir, standards) = standards();
    let selections = vec![
        Selection::new("EX", Some("1.0".to_string())),
        Selection::new("ex", Some("2.0".to_string())),
    ];
    let err = check_dataset(&dataset(), "ocean.json", &standards, &selections).unwrap_err();
    assert_eq!(
        err.to_string(),
        "suite EX selected more than once (versions 1.0 and 2.0)"
    );
}

#[test]
fn plain_summary_has_totals_and_failures() {
    let (_dir, standards) = standards();
    let selections = default_selections(&standards);
    let outcome = check_dataset(&dataset(), "ocean.json", &standards, &selections).unwrap();

    let text = render_summary(&outcome, false);
    assert!(text.starts_with("File: ocean.json\nData model: NETCDF4\n"));
    assert!(text.contains("TOTAL"));
    assert!(text.contains("50.0%"));
    assert!(text.contains("Failed checks:"));
    assert!(!text.contains('\u{1b}'));
}

#[test]
fn passing_dataset_has_no_failure_table() {
    let (_dir, standards) = standards();
    let dataset = dataset().with_attribute("summary", "Sea surface temperature");
    let outcome =
        check_dataset(&dataset, "ocean.json", &standards, &default_selections(&standards)).unwrap();

    assert!(!outcome.has_failures());
    assert!(!render_summary(&outcome, false).contains("Failed checks:"));
}

#[test]
fn bundled_catalogs_select_default_versions() {
    let standards = load_standards(None).unwrap();
    let selections: Vec<String> = default_selections(&standards)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(selections, vec!["ACDD=1.1", "GDS2=L2P"]);
}
