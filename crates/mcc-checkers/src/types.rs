use std::str::FromStr;

use mcc_engine::{CheckResult, Evaluation, Validator};
use mcc_model::{AttrValue, DataType, Variable};
use tracing::warn;

/// Compares a storage type with the rule's `type` attribute (one name or a list).
///
/// The tested value is hidden from results since only its type matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckTypes;

impl CheckTypes {
    fn check(&self, eval: &mut Evaluation<'_>, have: DataType) -> CheckResult {
        eval.hide_value();
        let Some(wanted) = eval.attributes().data_types() else {
            return eval.not_run("has no type to compare against");
        };

        let mut parsed = Vec::with_capacity(wanted.len());
        for name in &wanted {
            match DataType::from_str(name) {
                Ok(dtype) => parsed.push(dtype),
                Err(err) => {
                    warn!(rule = %eval.spec().full_path(), %err, "unknown type in rule");
                    return eval.not_run(format!("cannot be compared with unknown type \"{name}\""));
                }
            }
        }

        if parsed.iter().any(|want| have.satisfies(*want)) {
            return eval.success(format!("has type {have}"));
        }
        match parsed.as_slice() {
            [single] => eval.fail(format!("has type {have} when we want type {single}")),
            _ => eval.fail(format!("has type {have} not in {}", wanted.join(", "))),
        }
    }
}

impl Validator for CheckTypes {
    fn name(&self) -> &'static str {
        "check for valid data types"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>) -> CheckResult {
        match value {
            Some(value) => self.check(eval, value.data_type()),
            None => eval.fail("does not exist"),
        }
    }

    fn evaluate_vars(&self, eval: &mut Evaluation<'_>, variable: Option<&Variable>) -> CheckResult {
        match variable {
            Some(variable) => self.check(eval, variable.dtype),
            None => eval.fail("does not exist").without_value(),
        }
    }
}
