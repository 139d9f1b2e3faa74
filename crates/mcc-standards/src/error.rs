use std::path::PathBuf;

use mcc_engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid catalog {path}: {message}")]
    InvalidCatalog { path: PathBuf, message: String },

    #[error("catalog {path}: {source}")]
    Engine {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("suite {short_name} defined twice ({first} and {second})")]
    DuplicateSuite {
        short_name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("unknown suite \"{name}\"; available suites are ({})", .available.join(", "))]
    UnknownSuite { name: String, available: Vec<String> },

    #[error("invalid suite selection \"{selection}\", expected SHORT or SHORT=VERSION")]
    InvalidSelection { selection: String },

    #[error(transparent)]
    Configure(#[from] EngineError),
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the request, not the catalogs, is at fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            StandardsError::UnknownSuite { .. } | StandardsError::InvalidSelection { .. } => true,
            StandardsError::Configure(err) => err.is_client_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
