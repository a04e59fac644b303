//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `config.toml` and applies environment overrides.
//! The file is looked up at, in order: an explicit path, `$PATHWISE_CONFIG`,
//! and `<config_dir>/pathwise/config.toml`.

use pathwise_core::config::AppConfig;
use pathwise_core::error::{PathwiseError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::paths::PathwisePaths;

pub const ENV_CONFIG: &str = "PATHWISE_CONFIG";
pub const ENV_HOST: &str = "PATHWISE_HOST";
pub const ENV_PORT: &str = "PATHWISE_PORT";
pub const ENV_LOG: &str = "PATHWISE_LOG";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves and loads the application configuration.
#[derive(Clone)]
pub struct ConfigService {
    explicit_path: Option<PathBuf>,
    env: EnvLookup,
}

impl ConfigService {
    /// Creates a service reading the process environment.
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self {
            explicit_path,
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replaces the environment lookup.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Returns the config file location that [`load`](Self::load) reads.
    pub fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit_path {
            return Ok(path.clone());
        }
        if let Some(path) = (self.env)(ENV_CONFIG).filter(|p| !p.trim().is_empty()) {
            return Ok(PathBuf::from(path));
        }
        PathwisePaths::config_file()
    }

    /// Loads the configuration.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(&self) -> Result<AppConfig> {
        let path = self.config_path()?;
        let mut config = Self::read_file(&path)?;
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    fn apply_env_overrides(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(host) = (self.env)(ENV_HOST) {
            config.server.host = host;
        }
        if let Some(port) = (self.env)(ENV_PORT) {
            config.server.port = port.trim().parse().map_err(|_| {
                PathwiseError::config(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }
        if let Some(level) = (self.env)(ENV_LOG) {
            config.logging.level = level;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConfigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigService")
            .field("explicit_path", &self.explicit_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service =
            ConfigService::new(Some(dir.path().join("absent.toml"))).with_env(env_of(&[]));
        assert_eq!(service.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000

[simulator]
max_simulations = 25

[collaborators]
memory_url = "http://localhost:8002"
"#,
        )
        .unwrap();

        let config = ConfigService::new(Some(path))
            .with_env(env_of(&[]))
            .load()
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.simulator.max_simulations, 25);
        assert_eq!(
            config.collaborators.memory_url.as_deref(),
            Some("http://localhost:8002")
        );
        assert!(config.collaborators.recommender_url.is_none());
    }

    #[test]
    fn test_env_overrides_port_and_log() {
        let dir = TempDir::new().unwrap();
        let config = ConfigService::new(Some(dir.path().join("absent.toml")))
            .with_env(env_of(&[(ENV_PORT, "7070"), (ENV_LOG, "debug"), (ENV_HOST, "0.0.0.0")]))
            .load()
            .unwrap();
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigService::new(Some(dir.path().join("absent.toml")))
            .with_env(env_of(&[(ENV_PORT, "eighty")]))
            .load()
            .unwrap_err();
        assert!(matches!(err, PathwiseError::Config(_)));
    }

    #[test]
    fn test_env_config_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("from-env.toml");
        std::fs::write(&path, "[logging]\njson = true\n").unwrap();

        let service = ConfigService::new(None)
            .with_env(env_of(&[(ENV_CONFIG, path.to_str().unwrap())]));
        assert_eq!(service.config_path().unwrap(), path);
        assert!(service.load().unwrap().logging.json);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = ConfigService::new(Some(path))
            .with_env(env_of(&[]))
            .load()
            .unwrap_err();
        assert!(matches!(err, PathwiseError::Serialization { .. }));
    }
}
