//! Free-text format checks.

use std::sync::LazyLock;

use mcc_engine::{CheckResult, Evaluation, Validator};
use mcc_model::AttrValue;
use regex::Regex;

/// Characters outside `A-z`, digits, spaces and commas.
///
/// `A-z` spans `[ \ ] ^ _` and the backtick as well, so CF-style names such
/// as `sea_surface_temperature` do not count against the commas.
static OTHER_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-z0-9 ,]").expect("Invalid symbol regex"));

/// Heuristic for comma separated lists such as `keywords`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckCommaSeparated;

impl CheckCommaSeparated {
    /// Whether commas outnumber every other separator-like symbol.
    ///
    /// Returns `(dominant, commas, others)`.
    pub fn commas_dominant(value: &str) -> (bool, usize, usize) {
        let commas = value.chars().filter(|c| *c == ',').count();
        let others = OTHER_SYMBOLS.find_iter(value).count();
        (commas > others, commas, others)
    }
}

impl Validator for CheckCommaSeparated {
    fn name(&self) -> &'static str {
        "check for a comma separated value"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>) -> CheckResult {
        let Some(value) = value else {
            return eval.fail("does not exist");
        };
        let (dominant, _, _) = Self::commas_dominant(&value.to_string());
        if dominant {
            eval.success("is separated by commas")
        } else {
            eval.fail("might not be comma separated")
        }
    }
}

/// Passes when the value is one of the rule's `possible_values`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckPossibleValues;

impl Validator for CheckPossibleValues {
    fn name(&self) -> &'static str {
        "check for value in a set of possible values"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>) -> CheckResult {
        let Some(value) = value else {
            return eval.fail("does not exist");
        };
        let Some(possible) = eval.attributes().possible_values() else {
            return eval.not_run("has no possible values to compare against");
        };

        let value = value.to_string();
        if possible.contains(&value.as_str()) {
            eval.success(format!(
                "has value \"{value}\", which is in list of possible values"
            ))
        } else {
            eval.fail(format!(
                "value \"{value}\" not in list of possible values... allowed values are ({})",
                possible.join(", ")
            ))
        }
    }
}
