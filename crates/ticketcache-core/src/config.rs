//! Application configuration management.
//!
//! This module handles loading and saving the configuration, which holds the
//! account email, the user agent presented at login, the application id for
//! each account variant, and an optional override for the token directory.
//!
//! Configuration is stored at `~/.config/ticketcache/config.json`. Values from
//! the environment (and a `.env` file, if present) take precedence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::AccountVariant;

/// Application name used for config/data directory paths
const APP_NAME: &str = "ticketcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Application id presented for the primary variant
pub const DEFAULT_PRIMARY_APP_ID: &str = "3587dcbb-7f81-457c-9781-0e3f29f6f56a";

/// Application id presented for the alternate variant
pub const DEFAULT_ALTERNATE_APP_ID: &str = "e3d5ea9e-50bd-43b7-88bf-39794f4e3d40";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

const ENV_EMAIL: &str = "TICKETCACHE_EMAIL";
const ENV_USER_AGENT: &str = "TICKETCACHE_USER_AGENT";
const ENV_DATA_DIR: &str = "TICKETCACHE_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub email: Option<String>,
    pub user_agent: Option<String>,
    pub primary_app_id: Option<String>,
    pub alternate_app_id: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load the file config, then overlay `.env` and process environment values.
    pub fn load_with_env() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Overlay values from an environment lookup onto this config.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(email) = non_empty(ENV_EMAIL) {
            self.email = Some(email);
        }
        if let Some(user_agent) = non_empty(ENV_USER_AGENT) {
            self.user_agent = Some(user_agent);
        }
        if let Some(dir) = non_empty(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the per-variant token files
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn app_id(&self, variant: AccountVariant) -> &str {
        match variant {
            AccountVariant::Primary => self
                .primary_app_id
                .as_deref()
                .unwrap_or(DEFAULT_PRIMARY_APP_ID),
            AccountVariant::Alternate => self
                .alternate_app_id
                .as_deref()
                .unwrap_or(DEFAULT_ALTERNATE_APP_ID),
        }
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.app_id(AccountVariant::Primary), DEFAULT_PRIMARY_APP_ID);
        assert_eq!(config.app_id(AccountVariant::Alternate), DEFAULT_ALTERNATE_APP_ID);
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"email": "player@example.com", "alternate_app_id": "custom-app"}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.email.as_deref(), Some("player@example.com"));
        assert_eq!(config.app_id(AccountVariant::Alternate), "custom-app");
        assert_eq!(config.app_id(AccountVariant::Primary), DEFAULT_PRIMARY_APP_ID);
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_EMAIL, "env@example.com"),
            (ENV_DATA_DIR, "/tmp/tickets"),
            (ENV_USER_AGENT, "  "),
        ]);

        let mut config = Config {
            email: Some("file@example.com".to_string()),
            user_agent: Some("file-agent".to_string()),
            ..Config::default()
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.email.as_deref(), Some("env@example.com"));
        // Blank values are ignored
        assert_eq!(config.user_agent(), "file-agent");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/tickets"));
    }
}
