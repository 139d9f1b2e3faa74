use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use mcc_engine::{RuleSuite, SuiteDefinition, ValidatorRegistry};
use tracing::{info, warn};

use crate::catalog::CatalogSuite;
use crate::error::{Result, StandardsError};
use crate::selection::Selection;

/// Every convention available to the checker, keyed by short name.
#[derive(Debug, Clone, Default)]
pub struct StandardsRegistry {
    suites: BTreeMap<String, CatalogSuite>,
}

impl StandardsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.toml` catalog in `dir`, in file name order.
    pub fn load_dir(dir: &Path, validators: &ValidatorRegistry) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|err| StandardsError::io(dir, err))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StandardsError::io(dir, err))?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                warn!(path = %path.display(), "skipping non-catalog entry");
                continue;
            }
            registry.insert(CatalogSuite::from_path(&path, validators)?)?;
        }

        info!(
            dir = %dir.display(),
            suites = registry.len(),
            "loaded convention catalogs"
        );
        Ok(registry)
    }

    /// Add a suite, refusing a second suite with the same short name.
    pub fn insert(&mut self, suite: CatalogSuite) -> Result<()> {
        let short_name = suite.short_name().to_string();
        if let Some(existing) = self.suites.get(&short_name) {
            return Err(StandardsError::DuplicateSuite {
                short_name,
                first: existing.path().to_path_buf(),
                second: suite.path().to_path_buf(),
            });
        }
        self.suites.insert(short_name, suite);
        Ok(())
    }

    /// Look up a suite by short name, ignoring ASCII case.
    pub fn get(&self, short_name: &str) -> Option<&CatalogSuite> {
        self.suites.get(short_name).or_else(|| {
            self.suites
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(short_name))
                .map(|(_, suite)| suite)
        })
    }

    /// Build the suite a selection asks for.
    pub fn select(&self, selection: &Selection) -> Result<RuleSuite> {
        let suite = self
            .get(&selection.short_name)
            .ok_or_else(|| StandardsError::UnknownSuite {
                name: selection.short_name.clone(),
                available: self.short_names().into_iter().map(str::to_string).collect(),
            })?;
        let version = selection
            .version
            .as_deref()
            .unwrap_or_else(|| suite.default_version());
        Ok(suite.configure(version)?)
    }

    pub fn short_names(&self) -> Vec<&str> {
        self.suites.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogSuite> {
        self.suites.values()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}
