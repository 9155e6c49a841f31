//! Configuration
//!
//! Read from YAML. Every field has a default, so an absent file means
//! defaults:
//!
//! ```yaml
//! remote_base_url: https://diagramstore.aksw.org/
//! store_path: /home/me/.local/share/trellis/diagrams.db
//! ```

use crate::remote::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid remote_base_url '{0}'")]
    BaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote snapshot store; keys are appended to this URL
    pub remote_base_url: String,
    /// SQLite file for locally saved diagrams
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_base_url: DEFAULT_BASE_URL.to_string(),
            store_path: None,
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Load `path` if it exists, otherwise defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let parsed = reqwest::Url::parse(&self.remote_base_url)
            .map_err(|_| ConfigError::BaseUrl(self.remote_base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::BaseUrl(self.remote_base_url.clone()));
        }
        Ok(())
    }

    /// The configured store path, or `<data dir>/trellis/diagrams.db`
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }
}

/// Default config file location (`<config dir>/trellis/config.yaml`)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"))
        .join("trellis")
        .join("config.yaml")
}

/// Default store location (`<data dir>/trellis/diagrams.db`)
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"))
        .join("trellis")
        .join("diagrams.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn reads_fields() {
        let config = Config::from_yaml_str(
            "remote_base_url: http://localhost:8080/store/\nstore_path: /tmp/d.db\n",
        )
        .unwrap();
        assert_eq!(config.remote_base_url, "http://localhost:8080/store/");
        assert_eq!(config.store_path(), PathBuf::from("/tmp/d.db"));
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            Config::from_yaml_str("remote_base_url: ftp://example.org/"),
            Err(ConfigError::BaseUrl(_))
        ));
        assert!(matches!(
            Config::from_yaml_str("remote_base_url: nope"),
            Err(ConfigError::BaseUrl(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "remote_base_url: https://snapshots.example.org/\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.remote_base_url, "https://snapshots.example.org/");
    }

    #[test]
    fn default_store_path_ends_in_trellis_db() {
        assert!(default_store_path().ends_with("trellis/diagrams.db"));
    }
}
