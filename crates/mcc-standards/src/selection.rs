use std::fmt;
use std::str::FromStr;

use crate::error::StandardsError;

/// A requested suite: `SHORT` or `SHORT=VERSION`.
///
/// An empty version (`ACDD=`) means the suite's default version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub short_name: String,
    pub version: Option<String>,
}

impl Selection {
    pub fn new(short_name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            short_name: short_name.into(),
            version,
        }
    }
}

impl FromStr for Selection {
    type Err = StandardsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (short_name, version) = match s.split_once('=') {
            Some((short_name, version)) => (short_name.trim(), Some(version.trim())),
            None => (s.trim(), None),
        };
        if short_name.is_empty() {
            return Err(StandardsError::InvalidSelection {
                selection: s.to_string(),
            });
        }
        Ok(Self {
            short_name: short_name.to_string(),
            version: version
                .filter(|version| !version.is_empty())
                .map(str::to_string),
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}={version}", self.short_name),
            None => f.write_str(&self.short_name),
        }
    }
}
