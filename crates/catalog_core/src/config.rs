//! Process configuration for the catalog service.
//!
//! Values come from defaults overridden by `CATALOG_*` environment variables.
//! Blank variables are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CATALOG_LOG_DIR";
pub const ENV_DEFAULT_LIMIT: &str = "CATALOG_DEFAULT_LIMIT";

const DEFAULT_DB_FILE_NAME: &str = "catalog.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "catalog-logs";
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got `{value}`")]
    InvalidLimit { key: &'static str, value: String },
    #[error("{key} has unsupported log level `{value}`")]
    InvalidLevel { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
    /// Page size applied when a listing request omits `limit`.
    pub default_page_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
            default_page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl CatalogConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|_| ConfigError::InvalidLevel {
                key: ENV_LOG_LEVEL,
                value: level.clone(),
            })?;
        }
        if let Some(limit) = read(ENV_DEFAULT_LIMIT) {
            config.default_page_limit = match limit.parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::InvalidLimit {
                        key: ENV_DEFAULT_LIMIT,
                        value: limit,
                    })
                }
            };
        }

        Ok(config)
    }
}
