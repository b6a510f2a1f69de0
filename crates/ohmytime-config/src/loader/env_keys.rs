//! Environment variables that override file settings.

pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
pub const TELEGRAM_POLLING_TIMEOUT: &str = "TELEGRAM_POLLING_TIMEOUT";
pub const TELEGRAM_MAX_WORKERS: &str = "TELEGRAM_MAX_WORKERS";
pub const PATH_TO_INDEX: &str = "PATH_TO_INDEX";
pub const INDEX_SEARCH_LIMIT: &str = "INDEX_SEARCH_LIMIT";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
