//! Read-only dataset view: global attributes, groups and variables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::{AttrValue, DataType};

/// Attribute name to value.
pub type AttributeMap = BTreeMap<String, AttrValue>;

/// A variable and its own attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dtype: DataType,
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl Variable {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
            attributes: AttributeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Human-readable rendering of every attribute: `key: "value"` pairs joined by `; `.
    pub fn describe(&self) -> String {
        self.attributes
            .iter()
            .map(|(key, value)| format!("{key}: \"{value}\""))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A container of attributes and variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|variable| variable.name == name)
    }
}

/// A dataset under validation.
///
/// The root group carries the global attributes. Lookups of missing
/// attributes or variables yield `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Storage model reported by the loader (e.g. `NETCDF4`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_model: Option<String>,
    #[serde(flatten)]
    pub root: Group,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON interchange form of a dataset.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| ModelError::Json {
            origin: "<string>".to_string(),
            source,
        })
    }

    /// Load a dataset from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ModelError::Json {
            origin: path.display().to_string(),
            source,
        })
    }

    #[must_use]
    pub fn with_data_model(mut self, data_model: impl Into<String>) -> Self {
        self.data_model = Some(data_model.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.root.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.root.variables.push(variable);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Global attribute lookup.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.root.attribute(name)
    }

    /// Groups to scan for variables.
    ///
    /// A dataset without explicit subgroups is treated as one implicit group.
    pub fn scan_groups(&self) -> Vec<&Group> {
        if self.groups.is_empty() {
            vec![&self.root]
        } else {
            self.groups.iter().collect()
        }
    }
}
