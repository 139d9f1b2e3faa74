//! TOML convention catalogs.
//!
//! A catalog describes one convention: an `[about]` table with the suite
//! metadata, optional root `validators`, and a tree of `[[children]]`. A
//! child with a `group` key is a rule group; any other child is a rule spec
//! whose remaining keys become its attributes.
//!
//! ```toml
//! [about]
//! name = "Attribute Convention for Data Discovery"
//! short_name = "ACDD"
//! description = "..."
//! url = "https://wiki.esipfed.org/Attribute_Convention_for_Data_Discovery_1-3"
//! versions = ["1.1", "1.3"]
//! default_version = "1.1"
//!
//! [[children]]
//! group = "Global Attributes"
//! attributes = { scope = "globals" }
//! validators = ["existence"]
//!
//! [[children.children]]
//! name = "title"
//! description = "A short description of the dataset."
//! ```
//!
//! `versions` on any node limits it to the listed suite versions.

use std::fs;
use std::path::{Path, PathBuf};

use mcc_engine::{
    Attributes, EngineError, RuleGroup, RuleSuite, SuiteDefinition, ValidatorRef,
    ValidatorRegistry, keys,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, StandardsError};

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub about: AboutDef,
    /// Validators bound to every rule of the suite.
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutDef {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub url: String,
    pub versions: Vec<String>,
    pub default_version: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl AboutDef {
    pub fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new()
            .with(keys::NAME, self.name.as_str())
            .with(keys::SHORT_NAME, self.short_name.as_str())
            .with(keys::DESCRIPTION, self.description.as_str())
            .with(keys::URL, self.url.as_str())
            .with(keys::VERSIONS, self.versions.clone());
        if !self.options.is_empty() {
            attributes.insert(keys::OPTIONS, self.options.clone());
        }
        attributes
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeDef {
    Group(GroupDef),
    Rule(RuleDef),
}

impl NodeDef {
    fn versions(&self) -> Option<&[String]> {
        match self {
            NodeDef::Group(group) => group.versions.as_deref(),
            NodeDef::Rule(rule) => rule.versions.as_deref(),
        }
    }

    fn validators(&self) -> &[String] {
        match self {
            NodeDef::Group(group) => &group.validators,
            NodeDef::Rule(rule) => &rule.validators,
        }
    }

    /// Whether the node takes part in `version` of the suite.
    pub fn applies_to(&self, version: &str) -> bool {
        self.versions()
            .is_none_or(|versions| versions.iter().any(|v| v == version))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupDef {
    pub group: String,
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub versions: Option<Vec<String>>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleDef {
    pub name: String,
    /// Validators added after the enclosing group's validators.
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub versions: Option<Vec<String>>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl RuleDef {
    pub fn literal(&self) -> Attributes {
        self.attributes.clone().with(keys::NAME, self.name.as_str())
    }
}

/// A convention loaded from a catalog file.
#[derive(Debug, Clone)]
pub struct CatalogSuite {
    path: PathBuf,
    catalog: Catalog,
    about: Attributes,
    registry: ValidatorRegistry,
}

impl CatalogSuite {
    pub fn from_path(path: &Path, registry: &ValidatorRegistry) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|err| StandardsError::io(path, err))?;
        Self::from_toml_str(&source, path, registry)
    }

    /// Parse and check a catalog. `path` is only used in error messages.
    pub fn from_toml_str(
        source: &str,
        path: impl Into<PathBuf>,
        registry: &ValidatorRegistry,
    ) -> Result<Self> {
        let path = path.into();
        let catalog: Catalog = toml::from_str(source).map_err(|source| StandardsError::Toml {
            path: path.clone(),
            source,
        })?;
        let suite = Self {
            about: catalog.about.to_attributes(),
            catalog,
            path,
            registry: registry.clone(),
        };
        suite.check()?;
        debug!(
            suite = %suite.catalog.about.short_name,
            path = %suite.path.display(),
            "catalog loaded"
        );
        Ok(suite)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn invalid(&self, message: String) -> StandardsError {
        StandardsError::InvalidCatalog {
            path: self.path.clone(),
            message,
        }
    }

    /// Catch catalog mistakes at load time instead of on first use.
    fn check(&self) -> Result<()> {
        let about = &self.catalog.about;
        if !about.versions.contains(&about.default_version) {
            return Err(self.invalid(format!(
                "default_version \"{}\" is not one of ({})",
                about.default_version,
                about.versions.join(", ")
            )));
        }
        self.resolve(&self.catalog.validators)
            .map_err(|source| StandardsError::Engine {
                path: self.path.clone(),
                source,
            })?;
        self.check_nodes(&self.catalog.children)
    }

    fn check_nodes(&self, nodes: &[NodeDef]) -> Result<()> {
        for node in nodes {
            if let Some(versions) = node.versions()
                && let Some(unknown) = versions
                    .iter()
                    .find(|v| !self.catalog.about.versions.contains(v))
            {
                return Err(self.invalid(format!("node restricted to unknown version \"{unknown}\"")));
            }
            self.resolve(node.validators())
                .map_err(|source| StandardsError::Engine {
                    path: self.path.clone(),
                    source,
                })?;
            if let NodeDef::Group(group) = node {
                self.check_nodes(&group.children)?;
            }
        }
        Ok(())
    }

    fn resolve(&self, names: &[String]) -> mcc_engine::Result<Vec<ValidatorRef>> {
        names.iter().map(|name| self.registry.resolve(name)).collect()
    }

    fn populate(
        &self,
        group: &mut RuleGroup,
        nodes: &[NodeDef],
        version: &str,
    ) -> mcc_engine::Result<()> {
        for node in nodes.iter().filter(|node| node.applies_to(version)) {
            match node {
                NodeDef::Group(def) => {
                    let validators = self.resolve(&def.validators)?;
                    let subgroup = group.add_subgroup(&def.group, def.attributes.clone());
                    subgroup.add_validators(validators);
                    self.populate(subgroup, &def.children, version)?;
                }
                NodeDef::Rule(def) => {
                    let extra = self.resolve(&def.validators)?;
                    group.add_rulespec(def.literal(), &extra);
                }
            }
        }
        Ok(())
    }
}

impl SuiteDefinition for CatalogSuite {
    fn about(&self) -> &Attributes {
        &self.about
    }

    fn default_version(&self) -> &str {
        &self.catalog.about.default_version
    }

    fn configure(&self, version: &str) -> std::result::Result<RuleSuite, EngineError> {
        let mut suite = RuleSuite::for_version(self.about.clone(), version)?;
        suite.add_validators(self.resolve(&self.catalog.validators)?);
        self.populate(suite.root_mut(), &self.catalog.children, version)?;
        Ok(suite)
    }
}
