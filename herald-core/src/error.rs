//! Error types for herald-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading content records.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Underlying I/O failure, annotated with the file or directory involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A content record exists but could not be parsed.
    #[error("failed to parse content record at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The record file did not exist at the expected path.
    #[error("content record not found at {path}")]
    NotFound { path: PathBuf },

    /// An unpublishing refers to an edition no document contains.
    #[error("unpublishing {unpublishing} refers to missing edition {edition}")]
    DanglingEdition { unpublishing: u64, edition: u64 },

    /// A string could not be parsed as `<class>:<id>`.
    #[error("invalid entity reference '{0}'; expected content_item:<id> or unpublishing:<id>")]
    InvalidEntityRef(String),
}

/// Errors raised while loading `config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ContentError {
    ContentError::Io {
        path: path.into(),
        source,
    }
}
