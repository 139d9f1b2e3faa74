//! Rule-evaluation engine for metadata conventions.
//!
//! A convention is a [`RuleSuite`]: a tree of [`RuleGroup`]s whose leaves
//! are [`RuleSpec`]s bound to [`Validator`]s. Running the suite against a
//! [`mcc_model::Dataset`] walks the tree depth-first and produces a
//! [`GroupReport`] with pass/total counts folded up at every level and the
//! results of each group ordered by [`group_results_scorer`].
//!
//! ```ignore
//! let mut suite = RuleSuite::for_version(about, "1.3")?;
//! suite.add_validator(existence);
//! let globals = suite.add_subgroup("Global Attributes", Attributes::new());
//! globals.add_rulespec(Attributes::new().with(keys::NAME, "title"), &[]);
//! let report = suite.run(&dataset)?;
//! ```

pub mod attributes;
pub mod error;
pub mod group;
pub mod report;
pub mod result;
pub mod rule;
pub mod suite;
pub mod validator;

pub use attributes::{Attributes, Property, Scope, keys};
pub use error::{EngineError, Result};
pub use group::{RuleGroup, RuleNode};
pub use report::{
    AggregatedBundle, GroupReport, IdGenerator, Rank, ReportEntry, ReportId, group_results_scorer,
};
pub use result::CheckResult;
pub use rule::{RuleRun, RuleSpec};
pub use suite::{REQUIRED_KEYS, RuleSuite, SuiteDefinition};
pub use validator::{Evaluation, Validator, ValidatorRef, ValidatorRegistry};
