use mcc_engine::{CheckResult, Evaluation, Validator};
use mcc_model::{AttrValue, Variable};

/// Placeholder strings that count as "no value".
pub const USELESS_VALUES: &[&str] = &[
    "null", "NULL", "none", "NONE", "NIL", "nil", "", "n/a", "N\\A",
];

/// Passes when the value exists and is not a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckExistence;

impl Validator for CheckExistence {
    fn name(&self) -> &'static str {
        "check for existence"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>) -> CheckResult {
        match value {
            None => eval.fail("does not exist"),
            Some(value) => match value.as_str() {
                Some(text) if USELESS_VALUES.contains(&text) => {
                    eval.fail(format!("exists, but value \"{text}\" is not useful"))
                }
                _ => eval.success("exists"),
            },
        }
    }

    fn evaluate_vars(&self, eval: &mut Evaluation<'_>, variable: Option<&Variable>) -> CheckResult {
        let result = match variable {
            None => eval.fail("does not exist"),
            Some(_) => eval.success("exists"),
        };
        result.without_value()
    }
}
