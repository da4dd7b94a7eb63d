//! Configuration loading for chross.
//!
//! Configuration is loaded from a TOML file (default: `<data-dir>/chross.toml`).
//! Every field has a default, and a missing file means all defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use chross_client::SessionConfig;

/// Root configuration for chross.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Session configuration.
    #[serde(default)]
    pub session: SessionSection,
    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheSection,
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSection {
    /// Game namespace multiplexed on the channel (default: chross).
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

/// Cache configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSection {
    /// Directory for cached games (default: <data-dir>/cache).
    pub dir: Option<PathBuf>,
}

fn default_namespace() -> String {
    SessionConfig::DEFAULT_NAMESPACE.to_string()
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

impl CliConfig {
    /// Load configuration from `path`, or from `<data_dir>/chross.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: Option<&Path>, data_dir: &Path) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.join("chross.toml"));
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Self::parse(&path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::ReadError { path, source: e }),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Directory for cached games.
    pub fn cache_dir(&self, data_dir: &Path) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(|| data_dir.join("cache"))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = CliConfig::default();
        assert_eq!(config.session.namespace, "chross");
        assert_eq!(
            config.cache_dir(Path::new("/data")),
            PathBuf::from("/data/cache")
        );
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[session]
namespace = "chat"

[cache]
dir = "/var/cache/chross"
"#;
        let config = CliConfig::parse(Path::new("chross.toml"), toml).unwrap();
        assert_eq!(config.session.namespace, "chat");
        assert_eq!(
            config.cache_dir(Path::new("/data")),
            PathBuf::from("/var/cache/chross")
        );
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = CliConfig::parse(Path::new("chross.toml"), "[cache]\n").unwrap();
        assert_eq!(config.session.namespace, "chross");
        assert!(config.cache.dir.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load(None, dir.path()).await.unwrap();
        assert_eq!(config.session.namespace, "chross");
    }

    #[tokio::test]
    async fn malformed_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chross.toml");
        std::fs::write(&path, "[session\nnamespace = 3").unwrap();

        match CliConfig::load(None, dir.path()).await {
            Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }
}
