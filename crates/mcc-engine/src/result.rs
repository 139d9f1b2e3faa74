//! Outcome of one validator run against one value.

use std::fmt;

use mcc_model::AttrValue;
use serde::{Deserialize, Serialize};

use crate::attributes::{Attributes, Property, RESULT_BLACKLIST};

/// Result of a single validator invocation.
///
/// Carries a snapshot of the rule spec's attributes so renderers never need
/// to go back to the rule tree. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// `Some(true)` passed, `Some(false)` failed, `None` not executed.
    passed: Option<bool>,
    value: Option<AttrValue>,
    checker_name: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variable: Option<String>,
    attributes: Attributes,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    extra: Attributes,
}

impl CheckResult {
    pub fn new(
        passed: Option<bool>,
        value: Option<AttrValue>,
        spec_attributes: &Attributes,
        checker_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            passed,
            value,
            checker_name: checker_name.into(),
            message: message.into(),
            variable: None,
            attributes: spec_attributes.without(RESULT_BLACKLIST),
            extra: Attributes::new(),
        }
    }

    /// Record the variable this result belongs to (varattrs scope).
    #[must_use]
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    /// Drop the tested value so it is not displayed.
    #[must_use]
    pub fn without_value(mut self) -> Self {
        self.value = None;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Property>) -> Self {
        self.extra.insert(key, value);
        self
    }

    pub fn passed(&self) -> Option<bool> {
        self.passed
    }

    /// Counts as a pass only when the validator ran and passed.
    pub fn is_passed(&self) -> bool {
        self.passed == Some(true)
    }

    pub fn value(&self) -> Option<&AttrValue> {
        self.value.as_ref()
    }

    pub fn checker_name(&self) -> &str {
        &self.checker_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn extra(&self) -> &Attributes {
        &self.extra
    }

    pub fn name(&self) -> &str {
        self.attributes.name().unwrap_or_default()
    }

    fn display_name(&self) -> String {
        match &self.variable {
            Some(variable) => format!("{variable}:{}", self.name()),
            None => self.name().to_string(),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = if self.attributes.is_optional() {
            format!(
                "{} of variable {} {} {}",
                self.checker_name,
                self.display_name(),
                if self.is_passed() { "is" } else { "is not" },
                self.message
            )
        } else {
            format!(
                "{} {} because \"{}\" {}",
                self.checker_name,
                if self.is_passed() { "passed" } else { "failed" },
                self.display_name(),
                self.message
            )
        };
        f.write_str(line.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::keys;

    fn spec_attrs() -> Attributes {
        Attributes::new()
            .with(keys::NAME, "units")
            .with(keys::SCOPE, "varattrs")
            .with(keys::VALIDATORS, "hidden")
    }

    #[test]
    fn copies_spec_attributes_except_blacklist() {
        let result = CheckResult::new(Some(true), None, &spec_attrs(), "check", "exists");
        assert_eq!(result.name(), "units");
        assert!(result.attributes().contains_key(keys::SCOPE));
        assert!(!result.attributes().contains_key(keys::VALIDATORS));
    }

    #[test]
    fn renders_required_wording() {
        let result = CheckResult::new(
            Some(false),
            None,
            &spec_attrs(),
            "check for existence",
            "does not exist",
        )
        .with_variable("lon");
        assert_eq!(
            result.to_string(),
            "check for existence failed because \"lon:units\" does not exist"
        );
    }

    #[test]
    fn renders_optional_wording() {
        let attrs = spec_attrs().with(keys::PRIORITY, "optional");
        let result = CheckResult::new(Some(true), None, &attrs, "check for existence", "")
            .with_variable("lat");
        assert_eq!(result.to_string(), "check for existence of variable lat:units is");
    }

    #[test]
    fn not_executed_is_not_a_pass() {
        let result = CheckResult::new(None, None, &spec_attrs(), "check", "skipped");
        assert!(!result.is_passed());
        assert_eq!(result.passed(), None);
    }
}
