//! Validator protocol.
//!
//! A [`Validator`] implements the check itself; the engine decides which
//! values it sees based on the rule spec's [`Scope`](crate::Scope):
//!
//! - `globals`: [`Validator::evaluate_global`] once with the global attribute
//! - `varattrs`: [`Validator::evaluate_varattr`] once per variable
//! - `vars`: [`Validator::evaluate_vars`] once per group with the variable object
//!
//! Validators are stateless. Per-invocation state (dataset, rule spec,
//! value under test) lives in the [`Evaluation`] handed to each call, which
//! also builds results through [`Evaluation::success`] and
//! [`Evaluation::fail`] so result metadata stays consistent.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mcc_model::{AttrValue, Dataset, Variable};

use crate::attributes::{Attributes, Property};
use crate::error::{EngineError, Result};
use crate::result::CheckResult;
use crate::rule::RuleSpec;

/// A unit of validation logic bound to rule specs.
pub trait Validator: Send + Sync {
    /// Name shown in results.
    fn name(&self) -> &'static str;

    /// Check one value. `None` means the attribute does not exist.
    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>)
    -> CheckResult;

    /// Check one attribute of one variable.
    fn evaluate_varattr(
        &self,
        eval: &mut Evaluation<'_>,
        variable: &str,
        value: Option<&AttrValue>,
    ) -> CheckResult {
        self.evaluate_global(eval, value).with_variable(variable)
    }

    /// Check a variable object. `None` means the variable does not exist.
    ///
    /// The default checks the rendered attribute description held in the
    /// evaluation's current value.
    fn evaluate_vars(&self, eval: &mut Evaluation<'_>, _variable: Option<&Variable>) -> CheckResult {
        let rendered = eval.current_value().cloned();
        self.evaluate_global(eval, rendered.as_ref())
    }
}

impl fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name()).finish()
    }
}

/// Shared handle to a validator.
pub type ValidatorRef = Arc<dyn Validator>;

/// Context of one validator bound to one dataset and one rule spec.
#[derive(Debug)]
pub struct Evaluation<'a> {
    dataset: &'a Dataset,
    spec: &'a RuleSpec,
    checker_name: &'static str,
    current_value: Option<AttrValue>,
}

impl<'a> Evaluation<'a> {
    pub fn new(dataset: &'a Dataset, spec: &'a RuleSpec, checker_name: &'static str) -> Self {
        Self {
            dataset,
            spec,
            checker_name,
            current_value: None,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn spec(&self) -> &'a RuleSpec {
        self.spec
    }

    pub fn attributes(&self) -> &'a Attributes {
        self.spec.attributes()
    }

    pub fn current_value(&self) -> Option<&AttrValue> {
        self.current_value.as_ref()
    }

    pub fn set_current_value(&mut self, value: Option<AttrValue>) {
        self.current_value = value;
    }

    /// Hide the value from subsequently built results.
    pub fn hide_value(&mut self) {
        self.current_value = None;
    }

    pub fn success(&self, message: impl Into<String>) -> CheckResult {
        self.build(Some(true), message)
    }

    pub fn fail(&self, message: impl Into<String>) -> CheckResult {
        self.build(Some(false), message)
    }

    /// A result for a check that could not run.
    pub fn not_run(&self, message: impl Into<String>) -> CheckResult {
        self.build(None, message)
    }

    pub fn success_with<K, V>(
        &self,
        message: impl Into<String>,
        extra: impl IntoIterator<Item = (K, V)>,
    ) -> CheckResult
    where
        K: Into<String>,
        V: Into<Property>,
    {
        with_extra(self.success(message), extra)
    }

    pub fn fail_with<K, V>(
        &self,
        message: impl Into<String>,
        extra: impl IntoIterator<Item = (K, V)>,
    ) -> CheckResult
    where
        K: Into<String>,
        V: Into<Property>,
    {
        with_extra(self.fail(message), extra)
    }

    fn build(&self, passed: Option<bool>, message: impl Into<String>) -> CheckResult {
        CheckResult::new(
            passed,
            self.current_value.clone(),
            self.spec.attributes(),
            self.checker_name,
            message,
        )
    }
}

fn with_extra<K, V>(result: CheckResult, extra: impl IntoIterator<Item = (K, V)>) -> CheckResult
where
    K: Into<String>,
    V: Into<Property>,
{
    extra
        .into_iter()
        .fold(result, |result, (key, value)| result.with_extra(key, value))
}

/// Validators addressable by name, for declarative rule definitions.
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, ValidatorRef>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, validator: ValidatorRef) {
        self.validators.insert(name.into(), validator);
    }

    pub fn get(&self, name: &str) -> Option<ValidatorRef> {
        self.validators.get(name).cloned()
    }

    /// Look up a validator, failing on unknown names.
    pub fn resolve(&self, name: &str) -> Result<ValidatorRef> {
        self.get(name).ok_or_else(|| EngineError::UnknownValidator {
            name: name.to_string(),
        })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
