//! Client configuration.
//!
//! Values are resolved in order: command-line flag, environment
//! (`ROBERTA_SERVER`, `ROBERTA_TIMEOUT_SECS`), config file, defaults.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "http://localhost:1999";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_SERVER: &str = "ROBERTA_SERVER";
pub const ENV_TIMEOUT: &str = "ROBERTA_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        let base =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(base.join("roberta-admin").join("config.json"))
    }

    /// Load from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.server = normalize_server(&config.server);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Remove the config file at `path`, if any.
    pub fn reset_at(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove config file {}", path.display()))?;
        }
        Ok(())
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn reset() -> Result<()> {
        Self::reset_at(&Self::path()?)
    }

    /// Apply environment values, then command-line overrides.
    pub fn resolve(
        mut self,
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> Result<Self> {
        if let Some(server) = env(ENV_SERVER) {
            self.server = server;
        }
        if let Some(timeout) = env(ENV_TIMEOUT) {
            self.timeout_secs = timeout.trim().parse().with_context(|| {
                format!("{ENV_TIMEOUT} must be a number of seconds, got '{timeout}'")
            })?;
        }

        if let Some(server) = &overrides.server {
            self.server = server.clone();
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }

        self.server = normalize_server(&self.server);
        if self.server.is_empty() {
            anyhow::bail!("Server URL must not be empty");
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Read an environment variable, treating empty values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn normalize_server(server: &str) -> String {
    server.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            server: "https://lab.open-roberta.org".into(),
            timeout_secs: 30,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        Config::reset_at(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"server":"http://robot.local:1999/"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server, "http://robot.local:1999");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_precedence() {
        let env = env_of(&[(ENV_SERVER, "http://env:1999"), (ENV_TIMEOUT, "20")]);

        let config = Config::default()
            .resolve(&env, &Overrides::default())
            .unwrap();
        assert_eq!(config.server, "http://env:1999");
        assert_eq!(config.timeout_secs, 20);

        let overrides = Overrides {
            server: Some("http://flag:1999/".into()),
            timeout_secs: Some(3),
        };
        let config = Config::default().resolve(&env, &overrides).unwrap();
        assert_eq!(config.server, "http://flag:1999");
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_bad_env_timeout() {
        let env = env_of(&[(ENV_TIMEOUT, "soon")]);
        assert!(Config::default()
            .resolve(env, &Overrides::default())
            .is_err());
    }

    #[test]
    fn test_empty_server_rejected() {
        let overrides = Overrides {
            server: Some("/".into()),
            timeout_secs: None,
        };
        assert!(Config::default().resolve(|_| None, &overrides).is_err());
    }
}
