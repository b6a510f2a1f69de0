//! Configuration schema for the ohmytime bot.

use serde::{Deserialize, Serialize};

/// Default Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
/// Default long-polling timeout in seconds.
pub const DEFAULT_POLLING_TIMEOUT_SECS: u64 = 10;
/// Default number of dispatcher workers.
pub const DEFAULT_MAX_WORKERS: usize = 10;
/// Default location of the gazetteer file.
pub const DEFAULT_INDEX_PATH: &str = "./bin/cities15000.txt";
/// Default number of hits returned by one search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Root config for the bot process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OhmytimeConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

impl Default for OhmytimeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            telegram: TelegramConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

/// Telegram transport and worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather.
    #[serde(default)]
    pub token: String,
    /// Bot API base url.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Long-polling timeout in seconds.
    #[serde(default = "default_polling_timeout")]
    pub polling_timeout: u64,
    /// Number of workers handling updates concurrently.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            polling_timeout: default_polling_timeout(),
            max_workers: default_max_workers(),
        }
    }
}

/// Location index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Path to the gazetteer file.
    #[serde(default = "default_index_path")]
    pub path: String,
    /// Maximum number of hits returned by one search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_polling_timeout() -> u64 {
    DEFAULT_POLLING_TIMEOUT_SECS
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_index_path() -> String {
    DEFAULT_INDEX_PATH.to_string()
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
