use thiserror::Error;

/// Configuration errors raised while building or running a rule tree.
///
/// Validation failures are never errors; they are reported as failing
/// [`CheckResult`](crate::CheckResult)s.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("suite must have metadata ({}), missing ({})", .required.join(", "), .missing.join(", "))]
    MissingMetadata {
        required: Vec<String>,
        missing: Vec<String>,
    },

    #[error("scope \"{scope}\" not implemented (rule \"{rule}\")")]
    UnknownScope { rule: String, scope: String },

    #[error("rule under \"{path}\" has no name")]
    MissingName { path: String },

    #[error(
        "unsupported version \"{requested}\" for {suite}; available versions are ({})",
        .available.join(", ")
    )]
    UnsupportedVersion {
        suite: String,
        requested: String,
        available: Vec<String>,
    },

    #[error("unknown validator \"{name}\"")]
    UnknownValidator { name: String },
}

impl EngineError {
    /// True when the error stems from the caller's request rather than a
    /// malformed convention definition.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::UnsupportedVersion { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
