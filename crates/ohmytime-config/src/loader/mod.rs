//! Config loader: JSON5 file first, environment overrides last.

pub mod env_keys;

#[cfg(test)]
mod tests;

use crate::{ConfigError, OhmytimeConfig};
use directories::UserDirs;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default config filename.
const DEFAULT_CONFIG_FILE: &str = "ohmytime.json5";
/// Default config directory under the user home.
const DEFAULT_CONFIG_DIR: &str = ".ohmytime";

impl OhmytimeConfig {
    /// Load a config from a JSON5 file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a config from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        let config: OhmytimeConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit path when given, else the user config if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }
        match default_user_config_path() {
            Some(path) if path.exists() => Self::load_from_path(path),
            _ => {
                debug!("no config file found; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an environment lookup function.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = lookup(env_keys::TELEGRAM_TOKEN) {
            self.telegram.token = token;
        }
        if let Some(api_url) = lookup(env_keys::TELEGRAM_API_URL) {
            self.telegram.api_url = api_url;
        }
        if let Some(raw) = lookup(env_keys::TELEGRAM_POLLING_TIMEOUT) {
            self.telegram.polling_timeout = parse_env(env_keys::TELEGRAM_POLLING_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::TELEGRAM_MAX_WORKERS) {
            self.telegram.max_workers = parse_env(env_keys::TELEGRAM_MAX_WORKERS, &raw)?;
        }
        if let Some(path) = lookup(env_keys::PATH_TO_INDEX) {
            self.index.path = path;
        }
        if let Some(raw) = lookup(env_keys::INDEX_SEARCH_LIMIT) {
            self.index.search_limit = parse_env(env_keys::INDEX_SEARCH_LIMIT, &raw)?;
        }
        if let Some(level) = lookup(env_keys::LOG_LEVEL) {
            self.log_level = level;
        }

        debug!(
            "env overrides applied (polling_timeout={}, max_workers={}, index_path={})",
            self.telegram.polling_timeout, self.telegram.max_workers, self.index.path
        );
        self.validate()
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.max_workers == 0 {
            return Err(invalid("telegram.max_workers", "must be at least 1"));
        }
        if self.index.search_limit == 0 {
            return Err(invalid("index.search_limit", "must be at least 1"));
        }
        if self.telegram.api_url.trim().is_empty() {
            return Err(invalid("telegram.api_url", "cannot be empty"));
        }
        Ok(())
    }

    /// Validate the config and require the settings needed to talk to Telegram.
    pub fn ensure_runnable(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.telegram.token.trim().is_empty() {
            return Err(invalid(
                "telegram.token",
                "is required, set TELEGRAM_TOKEN",
            ));
        }
        Ok(())
    }
}

/// Default user config path (`~/.ohmytime/ohmytime.json5`).
pub fn default_user_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE))
}

fn parse_env<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidField {
        path: key.to_string(),
        message: format!("expected an unsigned integer, got '{raw}'"),
    })
}

fn invalid(path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.to_string(),
    }
}
