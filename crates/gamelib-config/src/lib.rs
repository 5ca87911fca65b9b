//! Configuration management for gamelib
//!
//! Handles storage locations, catalog API access, search tuning and server settings.
//! Configuration lives in a TOML file that environment variables can override.

mod sections;

pub use sections::{CatalogConfig, SearchConfig, ServerConfig, StorageConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Layered configuration error: {0}")]
    Layered(#[from] config::ConfigError),
}

/// Default directory for persisted key-value data
pub const DEFAULT_DATA_DIR: &str = ".gamelib";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "gamelib.toml";

/// Prefix for environment overrides, e.g. `GAMELIB_CATALOG__API_KEY`
pub const ENV_PREFIX: &str = "GAMELIB";

/// Conventional variable holding the catalog API key
pub const API_KEY_ENV: &str = "RAWG_API_KEY";

/// Main gamelib configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamelibConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl GamelibConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an optional file layered under `GAMELIB_*` environment variables
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                tracing::info!("Loading configuration from {}", path.display());
            } else {
                tracing::warn!("No configuration file at {}, using defaults", path.display());
            }
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.fill_api_key(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Use `key` as the catalog API key when none is configured
    pub fn fill_api_key(&mut self, key: Option<String>) {
        if self.catalog.api_key.is_empty()
            && let Some(key) = key.filter(|k| !k.trim().is_empty())
        {
            self.catalog.api_key = key;
        }
    }

    /// Reject settings that would make the service unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Keys become file names in the data directory
        for (field, key) in [
            ("storage.library_key", &self.storage.library_key),
            ("storage.recent_searches_key", &self.storage.recent_searches_key),
        ] {
            gamelib_storage::validate_key(key)
                .map_err(|e| ConfigError::Invalid(format!("{}: {}", field, e)))?;
        }
        if self.storage.library_key == self.storage.recent_searches_key {
            return Err(ConfigError::Invalid(
                "library and recent-search keys must differ".into(),
            ));
        }
        if self.catalog.page_size == 0 {
            return Err(ConfigError::Invalid("catalog.page_size must be > 0".into()));
        }
        if self.search.suggestion_limit == 0 {
            return Err(ConfigError::Invalid(
                "search.suggestion_limit must be > 0".into(),
            ));
        }
        if self.search.recent_limit == 0 {
            return Err(ConfigError::Invalid("search.recent_limit must be > 0".into()));
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}
