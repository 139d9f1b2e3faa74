//! Rule suites: versioned conventions rooted at an unnamed rule group.

use mcc_model::Dataset;
use tracing::{info, info_span};

use crate::attributes::{Attributes, Property, keys};
use crate::error::{EngineError, Result};
use crate::group::RuleGroup;
use crate::report::{GroupReport, IdGenerator};
use crate::rule::RuleSpec;
use crate::validator::ValidatorRef;

/// Metadata every suite must declare.
pub const REQUIRED_KEYS: &[&str] = &[
    keys::NAME,
    keys::SHORT_NAME,
    keys::DESCRIPTION,
    keys::URL,
    keys::VERSIONS,
];

/// A metadata convention ready to run against datasets.
#[derive(Debug, Clone)]
pub struct RuleSuite {
    root: RuleGroup,
    version: Option<String>,
}

impl RuleSuite {
    /// Build an empty suite from its metadata record.
    pub fn new(about: Attributes) -> Result<Self> {
        let missing = about.missing(REQUIRED_KEYS);
        if !missing.is_empty() {
            return Err(EngineError::MissingMetadata {
                required: REQUIRED_KEYS.iter().map(|key| (*key).to_string()).collect(),
                missing: missing.into_iter().map(str::to_string).collect(),
            });
        }
        Ok(Self {
            root: RuleGroup::unnamed(about),
            version: None,
        })
    }

    /// Build a suite and select `version`, rejecting versions it does not list.
    pub fn for_version(about: Attributes, version: &str) -> Result<Self> {
        let mut suite = Self::new(about)?;
        suite.require_version(version)?;
        suite.set_version(version);
        Ok(suite)
    }

    pub fn name(&self) -> &str {
        self.root.attributes().name().unwrap_or_default()
    }

    pub fn short_name(&self) -> &str {
        self.root.attributes().short_name().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.root.attributes().description().unwrap_or_default()
    }

    pub fn url(&self) -> &str {
        self.root.attributes().url().unwrap_or_default()
    }

    pub fn versions(&self) -> Vec<&str> {
        self.root.attributes().versions()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Record the configured version; rule specs added afterwards carry it.
    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        self.root.set_attribute(keys::VERSION, version.clone());
        self.version = Some(version);
    }

    pub fn supports(&self, version: &str) -> bool {
        self.versions().contains(&version)
    }

    pub fn require_version(&self, version: &str) -> Result<()> {
        if self.supports(version) {
            return Ok(());
        }
        Err(EngineError::UnsupportedVersion {
            suite: self.short_name().to_string(),
            requested: version.to_string(),
            available: self.versions().into_iter().map(str::to_string).collect(),
        })
    }

    pub fn root(&self) -> &RuleGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut RuleGroup {
        &mut self.root
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Property>) {
        self.root.set_attribute(key, value);
    }

    pub fn add_validator(&mut self, validator: ValidatorRef) {
        self.root.add_validator(validator);
    }

    pub fn add_validators(&mut self, validators: impl IntoIterator<Item = ValidatorRef>) {
        self.root.add_validators(validators);
    }

    pub fn add_rulespec(&mut self, literal: Attributes, extra_validators: &[ValidatorRef]) -> &RuleSpec {
        self.root.add_rulespec(literal, extra_validators)
    }

    pub fn add_rulespecs(
        &mut self,
        specs: impl IntoIterator<Item = Attributes>,
        extra_validators: &[ValidatorRef],
    ) {
        self.root.add_rulespecs(specs, extra_validators);
    }

    pub fn add_subgroup(&mut self, name: impl Into<String>, attributes: Attributes) -> &mut RuleGroup {
        self.root.add_subgroup(name, attributes)
    }

    /// Run the whole suite against `dataset`.
    pub fn run(&self, dataset: &Dataset) -> Result<GroupReport> {
        let span = info_span!(
            "suite_run",
            suite = self.short_name(),
            version = self.version().unwrap_or("-")
        );
        let _guard = span.enter();

        let report = self.root.run_with(dataset, &IdGenerator::new())?;
        info!(
            passed = report.passed,
            total = report.total,
            "suite run completed"
        );
        Ok(report)
    }
}

/// A convention that can produce a populated suite for one of its versions.
pub trait SuiteDefinition {
    /// Suite metadata: `name`, `short_name`, `description`, `url`, `versions`.
    fn about(&self) -> &Attributes;

    fn default_version(&self) -> &str;

    /// Build the suite for `version`.
    ///
    /// Fails with [`EngineError::UnsupportedVersion`] when the version is not
    /// one the convention lists.
    fn configure(&self, version: &str) -> Result<RuleSuite>;

    fn configure_default(&self) -> Result<RuleSuite> {
        self.configure(self.default_version())
    }

    fn short_name(&self) -> &str {
        self.about().short_name().unwrap_or_default()
    }

    fn versions(&self) -> Vec<&str> {
        self.about().versions()
    }
}
