use std::fs;

use mcc_checkers::builtin_registry;
use mcc_engine::{EngineError, RuleGroup, RuleNode, SuiteDefinition};
use mcc_model::{AttrValue, DataType, Dataset, Variable};
use mcc_standards::{CatalogSuite, Selection, StandardsError, StandardsRegistry, standards_root};

const EXAMPLE: &str = r#"
[about]
name = "Example Convention"
short_name = "EX"
description = "Example"
url = "https://example.org"
versions = ["1.0", "2.0"]
default_version = "1.0"

[[children]]
group = "Globals"
attributes = { scope = "globals" }
validators = ["existence"]

[[children.children]]
name = "title"

[[children.children]]
name = "Conventions"
validators = ["comma_separated"]
versions = ["2.0"]

[[children]]
group = "Variables"
attributes = { scope = "varattrs" }
validators = ["existence"]
versions = ["2.0"]

[[children.children]]
group = "Required"

[[children.children.children]]
name = "units"
"#;

fn outline(group: &RuleGroup, depth: usize, out: &mut String) {
    for child in group.children() {
        let indent = "  ".repeat(depth);
        match child {
            RuleNode::Group(sub) => {
                out.push_str(&format!("{indent}{}/\n", sub.name().unwrap_or_default()));
                outline(sub, depth + 1, out);
            }
            RuleNode::Spec(spec) => {
                let validators: Vec<_> = spec.validators().iter().map(|v| v.name()).collect();
                out.push_str(&format!(
                    "{indent}{} [{}]\n",
                    spec.full_path(),
                    validators.join(", ")
                ));
            }
        }
    }
}

fn example() -> CatalogSuite {
    CatalogSuite::from_toml_str(EXAMPLE, "example.toml", &builtin_registry()).unwrap()
}

#[test]
fn version_filter_includes_and_excludes_nodes() {
    let suite = example();

    let mut v1 = String::new();
    outline(suite.configure("1.0").unwrap().root(), 0, &mut v1);
    insta::assert_snapshot!(v1.trim_end(), @r"
    Globals/
      EX.Globals.title [check for existence]
    ");

    let mut v2 = String::new();
    outline(suite.configure("2.0").unwrap().root(), 0, &mut v2);
    insta::assert_snapshot!(v2.trim_end(), @r"
    Globals/
      EX.Globals.title [check for existence]
      EX.Globals.Conventions [check for existence, check for a comma separated value]
    Variables/
      Required/
        EX.Variables.Required.units [check for existence]
    ");
}

#[test]
fn unsupported_version_is_a_client_error() {
    let err = example().configure("3.0").unwrap_err();
    assert!(err.is_client_error());
    assert!(matches!(err, EngineError::UnsupportedVersion { ref requested, .. } if requested == "3.0"));
}

#[test]
fn configured_version_reaches_results() {
    let dataset = Dataset::new().with_attribute("title", "Ocean");
    let suite = example().configure_default().unwrap();
    assert_eq!(suite.version(), Some("1.0"));

    let report = suite.run(&dataset).unwrap();
    let leaves = report.leaf_results();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].attributes().version(), Some("1.0"));
    assert_eq!((report.passed, report.total), (1, 1));
}

#[test]
fn unknown_validator_is_reported_at_load() {
    let source = EXAMPLE.replace(r#"validators = ["comma_separated"]"#, r#"validators = ["udunits"]"#);
    let err = CatalogSuite::from_toml_str(&source, "example.toml", &builtin_registry()).unwrap_err();
    assert!(matches!(
        err,
        StandardsError::Engine {
            source: EngineError::UnknownValidator { .. },
            ..
        }
    ));
}

#[test]
fn load_dir_skips_other_files_and_rejects_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.toml"), EXAMPLE).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a catalog").unwrap();

    let registry = StandardsRegistry::load_dir(dir.path(), &builtin_registry()).unwrap();
    assert_eq!(registry.short_names(), vec!["EX"]);

    fs::write(dir.path().join("second.toml"), EXAMPLE).unwrap();
    let err = StandardsRegistry::load_dir(dir.path(), &builtin_registry()).unwrap_err();
    assert!(matches!(err, StandardsError::DuplicateSuite { ref short_name, .. } if short_name == "EX"));
}

#[test]
fn selection_picks_suite_and_version() {
    let mut registry = StandardsRegistry::new();
    registry.insert(example()).unwrap();

    let suite = registry.select(&"ex=2.0".parse::<Selection>().unwrap()).unwrap();
    assert_eq!(suite.version(), Some("2.0"));

    let err = registry.select(&"CF".parse::<Selection>().unwrap()).unwrap_err();
    assert!(err.is_client_error());
    assert!(err.to_string().contains("(EX)"));
}

#[test]
fn bundled_catalogs_load() {
    let registry = StandardsRegistry::load_dir(&standards_root(), &builtin_registry()).unwrap();
    assert_eq!(registry.short_names(), vec!["ACDD", "GDS2"]);

    for suite in registry.iter() {
        for version in suite.versions() {
            let configured = suite.configure(version).unwrap();
            assert!(!configured.root().children().is_empty());
        }
    }
}

#[test]
fn gds2_l2p_checks_variable_types() {
    let registry = StandardsRegistry::load_dir(&standards_root(), &builtin_registry()).unwrap();
    let suite = registry.select(&"GDS2=L2P".parse().unwrap()).unwrap();
    let dataset = Dataset::new()
        .with_attribute("title", "SST")
        .with_attribute("northernmost_latitude", AttrValue::typed(DataType::Float, 80.0))
        .with_variable(Variable::new("lat", DataType::Float).with_attribute("long_name", "latitude"))
        .with_variable(Variable::new("lon", DataType::Double));

    let report = suite.run(&dataset).unwrap();
    assert!(report.passed > 0);
    assert!(report.passed < report.total);

    let lon_type = report
        .leaf_results()
        .into_iter()
        .find(|result| result.name() == "lon" && result.checker_name() == "check for valid data types")
        .unwrap();
    assert_eq!(lon_type.message(), "has type double when we want type float");
}
