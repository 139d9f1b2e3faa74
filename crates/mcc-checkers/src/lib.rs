//! Built-in validators.
//!
//! Every validator here is stateless and reads its configuration (allowed
//! values, wanted types) from the rule spec attributes exposed by the
//! [`Evaluation`](mcc_engine::Evaluation) context. [`builtin_registry`]
//! makes them addressable by the names used in convention catalogs.

pub mod deprecated;
pub mod existence;
pub mod format;
pub mod iso8601;
pub mod registry;
pub mod types;

pub use deprecated::CheckDeprecated;
pub use existence::CheckExistence;
pub use format::{CheckCommaSeparated, CheckPossibleValues};
pub use iso8601::{CheckIsoDateTime, CheckIsoDuration};
pub use registry::builtin_registry;
pub use types::CheckTypes;
