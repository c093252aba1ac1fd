//! Persisted config (backend connection settings) in the app data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_data;

const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_PLATFORM: &str = "app.studynotes";
/// Project id shipped in the default config. While it is unchanged the mock backend is used.
pub const PLACEHOLDER_PROJECT_ID: &str = "YOUR_PROJECT_ID";
pub const PLACEHOLDER_DATABASE_ID: &str = "YOUR_DATABASE_ID";
pub const PLACEHOLDER_STORAGE_ID: &str = "YOUR_STORAGE_ID";
pub const DEFAULT_USER_COLLECTION_ID: &str = "users";

pub const ENV_ENDPOINT: &str = "STUDYNOTES_ENDPOINT";
pub const ENV_PROJECT_ID: &str = "STUDYNOTES_PROJECT_ID";
pub const ENV_DATABASE_ID: &str = "STUDYNOTES_DATABASE_ID";
pub const ENV_USER_COLLECTION_ID: &str = "STUDYNOTES_USER_COLLECTION_ID";

/// Connection settings for the remote account/database service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub endpoint: String,
    pub platform: String,
    pub project_id: String,
    pub database_id: String,
    pub user_collection_id: String,
    /// Not used by any operation yet; kept so config files round-trip.
    pub storage_id: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            project_id: PLACEHOLDER_PROJECT_ID.to_string(),
            database_id: PLACEHOLDER_DATABASE_ID.to_string(),
            user_collection_id: DEFAULT_USER_COLLECTION_ID.to_string(),
            storage_id: PLACEHOLDER_STORAGE_ID.to_string(),
        }
    }
}

impl BackendConfig {
    /// True once the project id has been set away from the placeholder.
    pub fn is_configured(&self) -> bool {
        let id = self.project_id.trim();
        !id.is_empty() && id != PLACEHOLDER_PROJECT_ID
    }

    /// Apply `STUDYNOTES_*` environment variables on top of this config.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_ENDPOINT) {
            self.endpoint = v;
        }
        if let Some(v) = get(ENV_PROJECT_ID) {
            self.project_id = v;
        }
        if let Some(v) = get(ENV_DATABASE_ID) {
            self.database_id = v;
        }
        if let Some(v) = get(ENV_USER_COLLECTION_ID) {
            self.user_collection_id = v;
        }
        self
    }

    /// Set one field by its config-file key.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim().to_string();
        let field = match key {
            "endpoint" => &mut self.endpoint,
            "platform" => &mut self.platform,
            "project_id" => &mut self.project_id,
            "database_id" => &mut self.database_id,
            "user_collection_id" => &mut self.user_collection_id,
            "storage_id" => &mut self.storage_id,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        *field = value;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Path of the config file, if the app data directory is available.
pub fn config_path() -> Option<PathBuf> {
    app_data::app_data_dir().map(|d| d.join(CONFIG_FILENAME))
}

/// Load config from the app data directory. Returns default config if missing or invalid.
pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

/// Load config from an explicit path. Returns default config if missing or invalid.
pub fn load_config_from(path: &Path) -> Config {
    let Ok(s) = std::fs::read_to_string(path) else {
        return Config::default();
    };
    match toml::from_str(&s) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Config::default()
        }
    }
}

/// Save config to the app data directory.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoDataDir)?;
    save_config_to(config, &path)
}

/// Set one backend field and persist the config.
pub fn set_backend_field(key: &str, value: &str) -> Result<(), ConfigError> {
    let mut config = load_config();
    config.backend.set_field(key, value)?;
    save_config(&config)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let s = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(path, s).map_err(ConfigError::Write)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine app data directory")]
    NoDataDir,
    #[error("unknown config key {0:?}")]
    UnknownKey(String),
    #[error("failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("failed to write config: {0}")]
    Write(std::io::Error),
}
