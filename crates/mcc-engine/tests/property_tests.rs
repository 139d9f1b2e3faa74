//! Property-based tests for aggregation, ordering and inheritance.

use std::sync::Arc;

use mcc_engine::{
    AggregatedBundle, Attributes, CheckResult, Evaluation, GroupReport, ReportEntry, ReportId,
    RuleGroup, Validator, ValidatorRef, attributes::EXTEND_BLACKLIST, group_results_scorer, keys,
};
use mcc_model::{AttrValue, Dataset};
use proptest::prelude::*;

/// Validator with a fixed outcome.
struct Fixed(bool);

impl Validator for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, _value: Option<&AttrValue>) -> CheckResult {
        if self.0 {
            eval.success("holds")
        } else {
            eval.fail("does not hold")
        }
    }
}

#[derive(Debug, Clone)]
enum Shape {
    /// A rule spec with one validator per outcome.
    Spec(Vec<bool>),
    Group(Vec<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = prop::collection::vec(any::<bool>(), 0..4).prop_map(Shape::Spec);
    leaf.prop_recursive(4, 32, 5, |inner| {
        prop::collection::vec(inner, 0..5).prop_map(Shape::Group)
    })
}

fn populate(group: &mut RuleGroup, children: &[Shape]) {
    for (idx, child) in children.iter().enumerate() {
        match child {
            Shape::Spec(outcomes) => {
                let validators: Vec<ValidatorRef> = outcomes
                    .iter()
                    .map(|passed| Arc::new(Fixed(*passed)) as ValidatorRef)
                    .collect();
                group.add_rulespec(
                    Attributes::new().with(keys::NAME, format!("spec{idx}")),
                    &validators,
                );
            }
            Shape::Group(grandchildren) => {
                let sub = group.add_subgroup(format!("group{idx}"), Attributes::new());
                populate(sub, grandchildren);
            }
        }
    }
}

fn assert_counts_fold(report: &GroupReport) -> Result<(), TestCaseError> {
    prop_assert!(report.passed <= report.total);
    let (passed, total) = report
        .results
        .iter()
        .map(ReportEntry::counts)
        .fold((0, 0), |(p, t), (ep, et)| (p + ep, t + et));
    prop_assert_eq!(report.passed, passed);
    prop_assert_eq!(report.total, total);
    for entry in &report.results {
        if let ReportEntry::Group(child) = entry {
            assert_counts_fold(child)?;
        }
    }
    Ok(())
}

fn entry(kind: u8, outcomes: &[bool]) -> ReportEntry {
    let attrs = Attributes::new().with(keys::NAME, "n");
    let results: Vec<CheckResult> = outcomes
        .iter()
        .map(|passed| CheckResult::new(Some(*passed), None, &attrs, "fixed", ""))
        .collect();
    match kind {
        0 => ReportEntry::Group(GroupReport {
            name: Some("g".into()),
            passed: 0,
            total: 0,
            id: mcc_engine::IdGenerator::new().next_id(),
            attributes: Attributes::new(),
            results: Vec::new(),
        }),
        1 => ReportEntry::Bundle(AggregatedBundle::from_results(
            "b",
            None,
            results,
            mcc_engine::IdGenerator::new().next_id(),
        )),
        _ => ReportEntry::Result(CheckResult::new(
            Some(outcomes.first().copied().unwrap_or(false)),
            None,
            &attrs,
            "fixed",
            "",
        )),
    }
}

proptest! {
    #[test]
    fn group_counts_are_sums_of_children(children in prop::collection::vec(shape(), 0..6)) {
        let mut root = RuleGroup::named("root", Attributes::new());
        populate(&mut root, &children);

        let report = root.run(&Dataset::new()).unwrap();

        assert_counts_fold(&report)?;
        if children.is_empty() {
            prop_assert_eq!((report.passed, report.total), (0, 0));
        }
    }

    #[test]
    fn scorer_sort_is_stable(
        entries in prop::collection::vec((0u8..3, prop::collection::vec(any::<bool>(), 1..4)), 0..20)
    ) {
        let mut tagged: Vec<(usize, ReportEntry)> = entries
            .iter()
            .enumerate()
            .map(|(idx, (kind, outcomes))| (idx, entry(*kind, outcomes)))
            .collect();
        tagged.sort_by_key(|(_, entry)| group_results_scorer(entry));

        for pair in tagged.windows(2) {
            let (left_idx, left) = &pair[0];
            let (right_idx, right) = &pair[1];
            let (left_rank, right_rank) = (group_results_scorer(left), group_results_scorer(right));
            prop_assert!(left_rank <= right_rank);
            prop_assert!((left_rank as u8) <= 5);
            if left_rank == right_rank {
                prop_assert!(left_idx < right_idx);
            }
        }
    }

    #[test]
    fn rule_specs_inherit_group_attributes(
        values in prop::collection::btree_map(
            prop::sample::select(vec![
                "scope", "priority", "version", "standard", "name", "description", "url", "options",
            ]),
            "[a-z]{1,8}",
            0..8,
        )
    ) {
        let attrs: Attributes = values.iter().map(|(key, value)| (*key, value.clone())).collect();
        let mut group = RuleGroup::named("group", attrs.clone());
        let spec = group.add_rulespec(Attributes::new().with(keys::NAME, "spec"), &[]);

        for (key, value) in attrs.iter() {
            if key == keys::NAME {
                continue;
            }
            if EXTEND_BLACKLIST.contains(&key.as_str()) {
                prop_assert!(spec.attributes().get(key).is_none());
            } else {
                prop_assert_eq!(spec.attributes().get(key), Some(value));
            }
        }
    }
}

#[test]
fn report_ids_are_distinct_within_a_run() {
    let mut root = RuleGroup::named("root", Attributes::new());
    populate(
        &mut root,
        &[
            Shape::Spec(vec![true, false]),
            Shape::Group(vec![Shape::Spec(vec![true, true]), Shape::Group(vec![])]),
        ],
    );
    let report = root.run(&Dataset::new()).unwrap();

    let mut ids: Vec<ReportId> = Vec::new();
    fn collect(report: &GroupReport, ids: &mut Vec<ReportId>) {
        ids.push(report.id);
        for entry in &report.results {
            match entry {
                ReportEntry::Bundle(bundle) => ids.push(bundle.id),
                ReportEntry::Group(group) => collect(group, ids),
                ReportEntry::Result(_) => {}
            }
        }
    }
    collect(&report, &mut ids);
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
}
