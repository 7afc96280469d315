//! `~/.herald/config.yaml`.
//!
//! A missing file means "all defaults"; a present but malformed file is an
//! error with the path attached.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::config_path;
use crate::types::{ContentFormat, QueueName};

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub publishing_api: PublishingApiConfig,
    pub default_queue: QueueName,
    /// Formats whose public pages are still rendered by this platform rather
    /// than the content store.
    pub served_locally: BTreeSet<ContentFormat>,
    pub worker: WorkerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            publishing_api: PublishingApiConfig::default(),
            default_queue: QueueName::default(),
            served_locally: ContentFormat::all()
                .iter()
                .copied()
                .filter(|f| *f != ContentFormat::CaseStudy)
                .collect(),
            worker: WorkerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingApiConfig {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PublishingApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://publishing-api.dev.gov.uk".to_string(),
            bearer_token: None,
            timeout_secs: 10,
        }
    }
}

/// Worker pool sizing and retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub concurrency: usize,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// How long shutdown waits for pending jobs before dropping them.
    pub shutdown_grace_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 60_000,
            shutdown_grace_secs: 30,
        }
    }
}

impl Config {
    /// Load `<home>/.herald/config.yaml`, falling back to defaults when the
    /// file does not exist.
    pub fn load_at(home: &Path) -> Result<Self, ConfigError> {
        Self::load_from(&config_path(home))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        let config: Config =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: PathBuf::from(path),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.publishing_api.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "publishing_api.endpoint must not be empty".to_string(),
            ));
        }
        if self.worker.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "worker.concurrency must be at least 1".to_string(),
            ));
        }
        if self.worker.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "worker.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().expect("home");
        let config = Config::load_at(home.path()).expect("load");
        assert_eq!(config, Config::default());
        assert!(!config.served_locally.contains(&ContentFormat::CaseStudy));
        assert!(config.served_locally.contains(&ContentFormat::Publication));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let home = TempDir::new().expect("home");
        let path = config_path(home.path());
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(
            &path,
            "default_queue: bulk\nserved_locally: [speech]\nworker:\n  concurrency: 8\n",
        )
        .expect("write");

        let config = Config::load_at(home.path()).expect("load");
        assert_eq!(config.default_queue, QueueName::from("bulk"));
        assert_eq!(
            config.served_locally,
            BTreeSet::from([ContentFormat::Speech])
        );
        assert_eq!(config.worker.concurrency, 8);
        assert_eq!(config.worker.max_attempts, 5);
        assert_eq!(config.publishing_api, PublishingApiConfig::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let home = TempDir::new().expect("home");
        let path = config_path(home.path());
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "worker: [not, a, mapping]\n").expect("write");

        let err = Config::load_at(home.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let home = TempDir::new().expect("home");
        let path = config_path(home.path());
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "worker:\n  concurrency: 0\n").expect("write");

        let err = Config::load_at(home.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
    }
}
