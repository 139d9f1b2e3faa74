//! Rule attributes.
//!
//! Groups, rule specs and results all carry an [`Attributes`] map. A fixed
//! set of keys (see [`keys`]) has typed accessors; any other key is kept as
//! free-form metadata for renderers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Recognised attribute keys.
pub mod keys {
    pub const NAME: &str = "name";
    pub const SHORT_NAME: &str = "short_name";
    pub const DESCRIPTION: &str = "description";
    pub const URL: &str = "url";
    pub const VERSIONS: &str = "versions";
    pub const VERSION: &str = "version";
    pub const OPTIONS: &str = "options";
    pub const SCOPE: &str = "scope";
    pub const PRIORITY: &str = "priority";
    pub const POSSIBLE_VALUES: &str = "possible_values";
    pub const TYPE: &str = "type";
    pub const VARIABLES: &str = "variables";
    pub const VALIDATORS: &str = "validators";
    pub const CHILDREN: &str = "children";
}

/// Keys a group never hands down to its children.
pub const EXTEND_BLACKLIST: &[&str] = &[
    keys::NAME,
    keys::SHORT_NAME,
    keys::DESCRIPTION,
    keys::URL,
    keys::OPTIONS,
    keys::VALIDATORS,
    keys::CHILDREN,
];

/// Keys left out of a group report.
pub const GROUP_REPORT_BLACKLIST: &[&str] = &[keys::VALIDATORS, keys::CHILDREN, keys::SCOPE];

/// Keys left out of the attribute snapshot copied onto a result.
pub const RESULT_BLACKLIST: &[&str] = &[keys::VALIDATORS, keys::CHILDREN];

/// Priority value that switches result rendering to the "optional" wording.
pub const OPTIONAL_PRIORITY: &str = "optional";

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Property {
    Bool(bool),
    Number(f64),
    Text(String),
    TextList(Vec<String>),
}

impl Property {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text values viewed as a list: a single text is a one-element list.
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            Property::Text(text) => vec![text.as_str()],
            Property::TextList(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Bool(value) => write!(f, "{value}"),
            Property::Number(value) => write!(f, "{value}"),
            Property::Text(value) => f.write_str(value),
            Property::TextList(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::Text(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::Text(value)
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

impl From<f64> for Property {
    fn from(value: f64) -> Self {
        Property::Number(value)
    }
}

impl From<Vec<String>> for Property {
    fn from(items: Vec<String>) -> Self {
        Property::TextList(items)
    }
}

impl From<Vec<&str>> for Property {
    fn from(items: Vec<&str>) -> Self {
        Property::TextList(items.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Property {
    fn from(items: &[&str]) -> Self {
        Property::TextList(items.iter().map(|item| (*item).to_string()).collect())
    }
}

/// Dataset scope a rule spec targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One global attribute of the dataset.
    #[default]
    Globals,
    /// One attribute on every (or every selected) variable.
    VarAttrs,
    /// One variable object per group.
    Vars,
}

impl Scope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "globals" => Some(Scope::Globals),
            "varattrs" => Some(Scope::VarAttrs),
            "vars" => Some(Scope::Vars),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Globals => "globals",
            Scope::VarAttrs => "varattrs",
            Scope::Vars => "vars",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered attribute map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Property>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Property>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Property>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Property> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Property)> {
        self.0.iter()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Attributes) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Copy of this map without the given keys.
    pub fn without(&self, blacklist: &[&str]) -> Attributes {
        Attributes(
            self.0
                .iter()
                .filter(|(key, _)| !blacklist.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    /// Keys from `required` that are not present, in the given order.
    pub fn missing<'k>(&self, required: &[&'k str]) -> Vec<&'k str> {
        required
            .iter()
            .copied()
            .filter(|key| !self.contains_key(key))
            .collect()
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Property::as_str)
    }

    fn list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key).map(Property::as_list)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(keys::NAME)
    }

    pub fn short_name(&self) -> Option<&str> {
        self.text(keys::SHORT_NAME)
    }

    pub fn description(&self) -> Option<&str> {
        self.text(keys::DESCRIPTION)
    }

    pub fn url(&self) -> Option<&str> {
        self.text(keys::URL)
    }

    pub fn version(&self) -> Option<&str> {
        self.text(keys::VERSION)
    }

    pub fn versions(&self) -> Vec<&str> {
        self.list(keys::VERSIONS).unwrap_or_default()
    }

    pub fn priority(&self) -> Option<&str> {
        self.text(keys::PRIORITY)
    }

    pub fn is_optional(&self) -> bool {
        self.priority() == Some(OPTIONAL_PRIORITY)
    }

    pub fn possible_values(&self) -> Option<Vec<&str>> {
        self.list(keys::POSSIBLE_VALUES)
    }

    /// Accepted type names; `type` may be a single name or a list.
    pub fn data_types(&self) -> Option<Vec<&str>> {
        self.list(keys::TYPE)
    }

    /// Variables a varattrs rule is restricted to, if any.
    pub fn variables(&self) -> Option<Vec<&str>> {
        self.list(keys::VARIABLES)
    }

    /// Scope of a rule spec, defaulting to [`Scope::Globals`].
    ///
    /// Any value other than the three known scopes is a fatal configuration
    /// error.
    pub fn scope(&self) -> Result<Scope> {
        match self.get(keys::SCOPE) {
            None => Ok(Scope::Globals),
            Some(value) => value
                .as_str()
                .and_then(Scope::parse)
                .ok_or_else(|| EngineError::UnknownScope {
                    rule: self.name().unwrap_or_default().to_string(),
                    scope: value.to_string(),
                }),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<Property>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
