use mcc_engine::{CheckResult, Evaluation, Validator};
use mcc_model::AttrValue;

/// Inverted existence: passes only when the element is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckDeprecated;

impl Validator for CheckDeprecated {
    fn name(&self) -> &'static str {
        "check for deprecated elements"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>) -> CheckResult {
        match value {
            Some(_) => eval.fail("Deprecated Attribute"),
            None => eval.success("does not exist"),
        }
    }
}
