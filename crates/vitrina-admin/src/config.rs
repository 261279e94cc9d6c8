//! # Admin Configuration
//!
//! Configuration for the dashboard back end.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VITRINA_DATABASE_PATH=/srv/vitrina/vitrina.db                      │
//! │     VITRINA_LOG_FILTER=vitrina=debug                                   │
//! │     VITRINA_DEFAULT_LANGUAGE=en                                        │
//! │     VITRINA_MAX_CONNECTIONS=10                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/vitrina-admin/vitrina.toml (Linux)                       │
//! │     ~/Library/Application Support/pe.vitrina.admin/vitrina.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/vitrina/vitrina.db"
//! max_connections = 5
//!
//! [logging]
//! filter = "info,vitrina=debug,sqlx=warn"
//!
//! [store]
//! default_language = "es"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use vitrina_core::Language;
use vitrina_db::DbConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Falls back to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,sqlx=warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

/// Defaults applied to newly created stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDefaults {
    #[serde(default)]
    pub default_language: Language,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub store: StoreDefaults,
}

impl AdminConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (vitrina.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading admin config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load admin config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Admin config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database.path is empty".into()));
            }
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            ConfigError::Invalid(format!(
                "logging.filter '{}' is not a valid filter: {}",
                self.logging.filter, e
            ))
        })?;

        Ok(())
    }

    /// Applies `VITRINA_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("VITRINA_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = lookup("VITRINA_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid VITRINA_MAX_CONNECTIONS"),
            }
        }

        if let Some(filter) = lookup("VITRINA_LOG_FILTER") {
            self.logging.filter = filter;
        }

        if let Some(language) = lookup("VITRINA_DEFAULT_LANGUAGE") {
            match language.parse::<Language>() {
                Ok(parsed) => self.store.default_language = parsed,
                Err(e) => warn!(error = %e, "Ignoring invalid VITRINA_DEFAULT_LANGUAGE"),
            }
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("pe", "vitrina", "admin")
            .map(|dirs| dirs.config_dir().join("vitrina.toml"))
    }

    /// Database file: the configured path or `vitrina.db` in the platform
    /// data directory.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("pe", "vitrina", "admin")
            .ok_or_else(|| ConfigError::Invalid("Could not determine app data directory".into()))?;
        std::fs::create_dir_all(dirs.data_dir())?;
        Ok(dirs.data_dir().join("vitrina.db"))
    }

    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?).max_connections(self.database.max_connections))
    }
}
