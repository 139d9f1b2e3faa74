//! Hierarchical report produced by running a rule group.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::result::CheckResult;

/// Display identifier of a report node.
///
/// Ids are unique within one report generation and carry no meaning beyond
/// that; nothing should compare them across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(u64);

impl ReportId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Hands out report ids for one run.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> ReportId {
        ReportId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Results of one rule spec folded into a single entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedBundle {
    pub name: String,
    pub passed: usize,
    pub total: usize,
    pub id: ReportId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub automatic_grouping: bool,
    /// Failures first, otherwise in evaluation order.
    pub results: Vec<CheckResult>,
}

impl AggregatedBundle {
    pub fn from_results(
        name: impl Into<String>,
        priority: Option<String>,
        mut results: Vec<CheckResult>,
        id: ReportId,
    ) -> Self {
        results.sort_by_key(CheckResult::is_passed);
        let passed = results.iter().filter(|result| result.is_passed()).count();
        Self {
            name: name.into(),
            passed,
            total: results.len(),
            id,
            priority,
            automatic_grouping: true,
            results,
        }
    }
}

/// Outcome of a rule group and everything below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub name: Option<String>,
    pub passed: usize,
    pub total: usize,
    pub id: ReportId,
    pub attributes: Attributes,
    pub results: Vec<ReportEntry>,
}

impl GroupReport {
    pub fn is_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// Every leaf result in report order.
    pub fn leaf_results(&self) -> Vec<&CheckResult> {
        let mut leaves = Vec::new();
        collect_leaves(&self.results, &mut leaves);
        leaves
    }
}

fn collect_leaves<'a>(entries: &'a [ReportEntry], leaves: &mut Vec<&'a CheckResult>) {
    for entry in entries {
        match entry {
            ReportEntry::Result(result) => leaves.push(result),
            ReportEntry::Bundle(bundle) => leaves.extend(bundle.results.iter()),
            ReportEntry::Group(group) => collect_leaves(&group.results, leaves),
        }
    }
}

/// One element of a group report's `results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportEntry {
    Result(CheckResult),
    Bundle(AggregatedBundle),
    Group(GroupReport),
}

impl ReportEntry {
    /// `(passed, total)` contribution of this entry to its parent.
    pub fn counts(&self) -> (usize, usize) {
        match self {
            ReportEntry::Result(result) => (usize::from(result.is_passed()), 1),
            ReportEntry::Bundle(bundle) => (bundle.passed, bundle.total),
            ReportEntry::Group(group) => (group.passed, group.total),
        }
    }
}

/// Sort rank of a report entry inside its group; lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    /// Nested groups are kept at the top in declaration order.
    Manual = 0,
    BundleFailed = 1,
    ResultFailed = 2,
    BundlePartial = 3,
    BundlePassed = 4,
    ResultPassed = 5,
}

/// Rank used to order a group's results: failures before passes, bundles
/// before single results of the same outcome.
pub fn group_results_scorer(entry: &ReportEntry) -> Rank {
    match entry {
        ReportEntry::Group(_) => Rank::Manual,
        ReportEntry::Bundle(bundle) if bundle.passed == bundle.total => Rank::BundlePassed,
        ReportEntry::Bundle(bundle) if bundle.passed == 0 => Rank::BundleFailed,
        ReportEntry::Bundle(_) => Rank::BundlePartial,
        ReportEntry::Result(result) if result.is_passed() => Rank::ResultPassed,
        ReportEntry::Result(_) => Rank::ResultFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::keys;

    fn result(passed: Option<bool>) -> CheckResult {
        let attrs = Attributes::new().with(keys::NAME, "title");
        CheckResult::new(passed, None, &attrs, "check", "msg")
    }

    #[test]
    fn ids_are_monotonic() {
        let ids = IdGenerator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        assert!(first < second);
        assert_eq!(first.get(), 1);
    }

    #[test]
    fn bundle_puts_failures_first() {
        let bundle = AggregatedBundle::from_results(
            "units",
            None,
            vec![result(Some(true)), result(Some(false)), result(None)],
            ReportId(1),
        );
        assert_eq!(bundle.passed, 1);
        assert_eq!(bundle.total, 3);
        assert_eq!(bundle.results[0].passed(), Some(false));
        assert_eq!(bundle.results[1].passed(), None);
        assert_eq!(bundle.results[2].passed(), Some(true));
    }

    #[test]
    fn scorer_ranks() {
        let bundle = |passed: &[bool]| {
            ReportEntry::Bundle(AggregatedBundle::from_results(
                "b",
                None,
                passed.iter().map(|p| result(Some(*p))).collect(),
                ReportId(1),
            ))
        };
        assert_eq!(group_results_scorer(&bundle(&[false, false])), Rank::BundleFailed);
        assert_eq!(group_results_scorer(&bundle(&[true, false])), Rank::BundlePartial);
        assert_eq!(group_results_scorer(&bundle(&[true, true])), Rank::BundlePassed);
        assert_eq!(
            group_results_scorer(&ReportEntry::Result(result(Some(true)))),
            Rank::ResultPassed
        );
        assert_eq!(
            group_results_scorer(&ReportEntry::Result(result(None))),
            Rank::ResultFailed
        );
    }

    #[test]
    fn empty_bundle_counts_as_passed() {
        let entry = ReportEntry::Bundle(AggregatedBundle::from_results("b", None, vec![], ReportId(1)));
        assert_eq!(group_results_scorer(&entry), Rank::BundlePassed);
    }
}
