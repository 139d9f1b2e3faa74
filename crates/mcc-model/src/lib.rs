//! Dataset model for the metadata compliance checker.
//!
//! A [`Dataset`] is a read-only tree of attribute-bearing containers: global
//! attributes on the root group, optional nested [`Group`]s, and
//! [`Variable`]s that carry their own attributes. The model mirrors the
//! netCDF data model closely enough for metadata checks and is normally
//! produced by an external loader in its JSON interchange form.

pub mod dataset;
pub mod error;
pub mod value;

pub use dataset::{AttributeMap, Dataset, Group, Variable};
pub use error::{ModelError, Result};
pub use value::{AttrValue, DataType};
