#![deny(unsafe_code)]

//! Metadata conventions defined as TOML catalogs.
//!
//! Each catalog under the standards directory becomes a [`CatalogSuite`]
//! that builds a [`mcc_engine::RuleSuite`] for any of its versions.

pub mod catalog;
pub mod error;
pub mod paths;
pub mod registry;
pub mod selection;

pub use crate::catalog::{Catalog, CatalogSuite, NodeDef};
pub use crate::error::{Result, StandardsError};
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::registry::StandardsRegistry;
pub use crate::selection::Selection;
