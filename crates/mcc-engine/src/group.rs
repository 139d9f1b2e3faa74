//! Rule groups: the inner nodes of the rule tree.

use std::sync::Arc;

use mcc_model::Dataset;
use tracing::{debug, debug_span};

use crate::attributes::{Attributes, EXTEND_BLACKLIST, GROUP_REPORT_BLACKLIST, Property};
use crate::error::Result;
use crate::report::{
    AggregatedBundle, GroupReport, IdGenerator, ReportEntry, group_results_scorer,
};
use crate::rule::{PathSegment, RuleSpec};
use crate::validator::ValidatorRef;

/// Child of a rule group, in declaration order.
#[derive(Debug, Clone)]
pub enum RuleNode {
    Spec(RuleSpec),
    Group(RuleGroup),
}

/// A named collection of rule specs and nested groups.
///
/// Attributes set on a group (other than its identity keys) are handed down
/// to every child created after they were set, and the group's validators
/// are bound to every rule spec added to it.
#[derive(Debug, Clone, Default)]
pub struct RuleGroup {
    name: Option<String>,
    attributes: Attributes,
    validators: Vec<ValidatorRef>,
    children: Vec<RuleNode>,
    parent: Option<Arc<PathSegment>>,
}

impl RuleGroup {
    pub fn named(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: Some(name.into()),
            attributes,
            ..Self::default()
        }
    }

    pub fn unnamed(attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Explicit name, else the `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| self.attributes.name())
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn validators(&self) -> &[ValidatorRef] {
        &self.validators
    }

    pub fn children(&self) -> &[RuleNode] {
        &self.children
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Property>) {
        self.attributes.insert(key, value);
    }

    pub fn add_validator(&mut self, validator: ValidatorRef) {
        self.validators.push(validator);
    }

    pub fn add_validators(&mut self, validators: impl IntoIterator<Item = ValidatorRef>) {
        self.validators.extend(validators);
    }

    /// Attributes a child inherits from this group.
    pub fn inheritable_attributes(&self) -> Attributes {
        self.attributes.without(EXTEND_BLACKLIST)
    }

    fn segment(&self) -> Option<Arc<PathSegment>> {
        match self.attributes.short_name().or(self.name()) {
            Some(label) => Some(PathSegment::new(label, self.parent.clone())),
            None => self.parent.clone(),
        }
    }

    fn bound_validators(&self, extra: &[ValidatorRef]) -> Vec<ValidatorRef> {
        self.validators.iter().chain(extra).cloned().collect()
    }

    /// Add a rule spec bound to this group's validators followed by `extra_validators`.
    pub fn add_rulespec(
        &mut self,
        literal: Attributes,
        extra_validators: &[ValidatorRef],
    ) -> &RuleSpec {
        let spec = RuleSpec::compose(
            &self.inheritable_attributes(),
            &literal,
            &Attributes::new(),
            self.bound_validators(extra_validators),
        )
        .with_parent(self.segment());
        self.children.push(RuleNode::Spec(spec));
        match self.children.last() {
            Some(RuleNode::Spec(spec)) => spec,
            _ => unreachable!("a rule spec was just pushed"),
        }
    }

    /// Add several rule specs sharing one inherited attribute snapshot.
    pub fn add_rulespecs(
        &mut self,
        specs: impl IntoIterator<Item = Attributes>,
        extra_validators: &[ValidatorRef],
    ) {
        let inherited = self.inheritable_attributes();
        let validators = self.bound_validators(extra_validators);
        let parent = self.segment();
        let overrides = Attributes::new();
        for literal in specs {
            let spec = RuleSpec::compose(&inherited, &literal, &overrides, validators.clone())
                .with_parent(parent.clone());
            self.children.push(RuleNode::Spec(spec));
        }
    }

    /// Add a nested group and return it for further population.
    ///
    /// The child starts with this group's inheritable attributes updated by
    /// `attributes`, and a copy of this group's validators.
    pub fn add_subgroup(&mut self, name: impl Into<String>, attributes: Attributes) -> &mut RuleGroup {
        let mut inherited = self.inheritable_attributes();
        inherited.merge(&attributes);
        let child = RuleGroup {
            name: Some(name.into()),
            attributes: inherited,
            validators: self.validators.clone(),
            children: Vec::new(),
            parent: self.segment(),
        };
        self.children.push(RuleNode::Group(child));
        match self.children.last_mut() {
            Some(RuleNode::Group(group)) => group,
            _ => unreachable!("a rule group was just pushed"),
        }
    }

    /// Run every child against `dataset`, depth-first and left to right.
    pub fn run(&self, dataset: &Dataset) -> Result<GroupReport> {
        self.run_with(dataset, &IdGenerator::new())
    }

    /// Like [`RuleGroup::run`], drawing report ids from `ids`.
    pub fn run_with(&self, dataset: &Dataset, ids: &IdGenerator) -> Result<GroupReport> {
        let span = debug_span!("rule_group", name = self.name().unwrap_or("-"));
        let _guard = span.enter();

        let mut passed = 0;
        let mut total = 0;
        let mut results = Vec::new();

        for child in &self.children {
            match child {
                RuleNode::Group(group) => {
                    let report = group.run_with(dataset, ids)?;
                    passed += report.passed;
                    total += report.total;
                    results.push(ReportEntry::Group(report));
                }
                RuleNode::Spec(spec) => {
                    let mut spec_results: Vec<_> = spec.run(dataset)?.collect();
                    if spec_results.len() > 1 {
                        let bundle = AggregatedBundle::from_results(
                            spec.name().unwrap_or_default(),
                            spec.attributes().priority().map(str::to_string),
                            spec_results,
                            ids.next_id(),
                        );
                        passed += bundle.passed;
                        total += bundle.total;
                        results.push(ReportEntry::Bundle(bundle));
                    } else if let Some(result) = spec_results.pop() {
                        passed += usize::from(result.is_passed());
                        total += 1;
                        results.push(ReportEntry::Result(result));
                    }
                }
            }
        }

        results.sort_by_key(group_results_scorer);
        debug!(passed, total, "rule group completed");

        Ok(GroupReport {
            name: self.name().map(str::to_string),
            passed,
            total,
            id: ids.next_id(),
            attributes: self.attributes.without(GROUP_REPORT_BLACKLIST),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::keys;

    #[test]
    fn subgroup_inherits_but_not_identity() {
        let mut root = RuleGroup::named(
            "root",
            Attributes::new()
                .with(keys::DESCRIPTION, "root description")
                .with(keys::VERSION, "1.3"),
        );
        let child = root.add_subgroup("child", Attributes::new().with(keys::SCOPE, "varattrs"));
        assert_eq!(child.name(), Some("child"));
        assert_eq!(child.attributes().version(), Some("1.3"));
        assert_eq!(child.attributes().description(), None);
        assert!(child.attributes().contains_key(keys::SCOPE));
    }

    #[test]
    fn attributes_set_later_reach_later_children() {
        let mut root = RuleGroup::named("root", Attributes::new());
        root.add_rulespec(Attributes::new().with(keys::NAME, "early"), &[]);
        root.set_attribute(keys::PRIORITY, "optional");
        root.add_rulespec(Attributes::new().with(keys::NAME, "late"), &[]);

        let priorities: Vec<_> = root
            .children()
            .iter()
            .map(|node| match node {
                RuleNode::Spec(spec) => spec.attributes().priority(),
                RuleNode::Group(_) => None,
            })
            .collect();
        assert_eq!(priorities, vec![None, Some("optional")]);
    }

    #[test]
    fn literal_attributes_beat_inherited() {
        let mut root = RuleGroup::named("root", Attributes::new().with(keys::SCOPE, "varattrs"));
        let spec = root.add_rulespec(
            Attributes::new()
                .with(keys::NAME, "title")
                .with(keys::SCOPE, "globals"),
            &[],
        );
        assert_eq!(spec.attributes().scope().unwrap(), crate::Scope::Globals);
    }

    #[test]
    fn empty_group_reports_zero_of_zero() {
        let report = RuleGroup::named("empty", Attributes::new())
            .run(&Dataset::new())
            .unwrap();
        assert_eq!((report.passed, report.total), (0, 0));
        assert!(report.results.is_empty());
    }
}
