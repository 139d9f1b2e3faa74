//! Rule specs: the leaves of the rule tree.

use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::Instant;

use mcc_model::{AttrValue, Dataset, Variable};
use tracing::debug;

use crate::attributes::{Attributes, Scope};
use crate::error::{EngineError, Result};
use crate::result::CheckResult;
use crate::validator::{Evaluation, ValidatorRef};

/// Display label of a group, linked to its parent's label.
///
/// Used only to rebuild dotted names; it does not own or reach the groups.
#[derive(Debug)]
pub(crate) struct PathSegment {
    label: String,
    parent: Option<Arc<PathSegment>>,
}

impl PathSegment {
    pub(crate) fn new(label: impl Into<String>, parent: Option<Arc<PathSegment>>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            parent,
        })
    }

    /// Labels from the root down to this segment.
    pub(crate) fn labels(self: &Arc<Self>) -> Vec<&str> {
        let mut labels = Vec::new();
        let mut current = Some(self);
        while let Some(segment) = current {
            labels.push(segment.label.as_str());
            current = segment.parent.as_ref();
        }
        labels.reverse();
        labels
    }
}

/// A named rule and the validators bound to it.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    attributes: Attributes,
    validators: Vec<ValidatorRef>,
    parent: Option<Arc<PathSegment>>,
}

impl RuleSpec {
    /// A free-standing rule spec with the given attributes and validators.
    pub fn new(attributes: Attributes, validators: Vec<ValidatorRef>) -> Self {
        Self {
            attributes,
            validators,
            parent: None,
        }
    }

    /// Merge attributes with precedence `inherited < literal < overrides`.
    pub fn compose(
        inherited: &Attributes,
        literal: &Attributes,
        overrides: &Attributes,
        validators: Vec<ValidatorRef>,
    ) -> Self {
        let mut attributes = inherited.clone();
        attributes.merge(literal);
        attributes.merge(overrides);
        Self::new(attributes, validators)
    }

    pub(crate) fn with_parent(mut self, parent: Option<Arc<PathSegment>>) -> Self {
        self.parent = parent;
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn validators(&self) -> &[ValidatorRef] {
        &self.validators
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name()
    }

    /// Dotted path from the suite root to this rule, e.g. `ACDD.Global Attributes.Highly Recommended.title`.
    pub fn full_path(&self) -> String {
        let mut components: Vec<&str> = self
            .parent
            .as_ref()
            .map(PathSegment::labels)
            .unwrap_or_default();
        components.push(self.name().unwrap_or_default());
        components.join(".")
    }

    /// Evaluate every bound validator against `dataset`.
    ///
    /// The name and scope are checked up front; a missing name or an
    /// unknown scope is a configuration error. The returned sequence is lazy
    /// and single-pass: validators run as it is consumed, so a caller that
    /// stops early leaves later validators unexecuted.
    pub fn run<'a>(&'a self, dataset: &'a Dataset) -> Result<RuleRun<'a>> {
        let name = self.name().ok_or_else(|| EngineError::MissingName {
            path: self.full_path(),
        })?;
        let scope = self.attributes.scope()?;
        debug!(
            rule = %self.full_path(),
            scope = %scope,
            version = self.attributes.version().unwrap_or("-"),
            "running rule spec"
        );
        let targets = collect_targets(self, dataset, name, scope);
        Ok(RuleRun {
            spec: self,
            dataset,
            targets,
            validator_idx: 0,
            target_idx: 0,
            evaluation: None,
            started: None,
        })
    }
}

/// One value a validator is pointed at.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Global(Option<&'a AttrValue>),
    VarAttr {
        variable: &'a str,
        value: Option<&'a AttrValue>,
    },
    Var(Option<&'a Variable>),
}

fn collect_targets<'a>(
    spec: &'a RuleSpec,
    dataset: &'a Dataset,
    name: &'a str,
    scope: Scope,
) -> Vec<Target<'a>> {
    match scope {
        Scope::Globals => vec![Target::Global(dataset.attribute(name))],
        Scope::VarAttrs => {
            let selected = spec.attributes.variables();
            let mut targets = Vec::new();
            for group in dataset.scan_groups() {
                match &selected {
                    Some(names) => {
                        for &variable in names {
                            let value = group
                                .variable(variable)
                                .and_then(|found| found.attribute(name));
                            targets.push(Target::VarAttr { variable, value });
                        }
                    }
                    None => {
                        for variable in &group.variables {
                            targets.push(Target::VarAttr {
                                variable: &variable.name,
                                value: variable.attribute(name),
                            });
                        }
                    }
                }
            }
            targets
        }
        Scope::Vars => dataset
            .scan_groups()
            .into_iter()
            .map(|group| Target::Var(group.variable(name)))
            .collect(),
    }
}

/// Lazy results of one rule spec: validator order, then value order.
///
/// Not restartable. Consumers that need complete counts must drain it.
#[derive(Debug)]
pub struct RuleRun<'a> {
    spec: &'a RuleSpec,
    dataset: &'a Dataset,
    targets: Vec<Target<'a>>,
    validator_idx: usize,
    target_idx: usize,
    evaluation: Option<Evaluation<'a>>,
    started: Option<Instant>,
}

impl RuleRun<'_> {
    fn finish_validator(&mut self) {
        if let (Some(started), Some(validator)) = (
            self.started.take(),
            self.spec.validators.get(self.validator_idx),
        ) {
            debug!(
                checker = validator.name(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "validator completed"
            );
        }
        self.evaluation = None;
        self.validator_idx += 1;
        self.target_idx = 0;
    }
}

impl Iterator for RuleRun<'_> {
    type Item = CheckResult;

    fn next(&mut self) -> Option<CheckResult> {
        loop {
            let validator = self.spec.validators.get(self.validator_idx)?.clone();
            let Some(target) = self.targets.get(self.target_idx).copied() else {
                self.finish_validator();
                continue;
            };
            self.target_idx += 1;

            let evaluation = self.evaluation.get_or_insert_with(|| {
                debug!(checker = validator.name(), "running validator");
                Evaluation::new(self.dataset, self.spec, validator.name())
            });
            if self.started.is_none() {
                self.started = Some(Instant::now());
            }

            let result = match target {
                Target::Global(value) => {
                    evaluation.set_current_value(value.cloned());
                    validator.evaluate_global(evaluation, value)
                }
                Target::VarAttr { variable, value } => {
                    evaluation.set_current_value(value.cloned());
                    validator.evaluate_varattr(evaluation, variable, value)
                }
                Target::Var(variable) => {
                    evaluation.set_current_value(
                        variable.map(|found| AttrValue::Text(found.describe())),
                    );
                    validator.evaluate_vars(evaluation, variable)
                }
            };
            return Some(result);
        }
    }
}

impl FusedIterator for RuleRun<'_> {}
