//! Tests for config loading and environment overrides.

use super::*;
use crate::{DEFAULT_MAX_WORKERS, DEFAULT_POLLING_TIMEOUT_SECS};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

/// Verify that an empty config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = OhmytimeConfig::load_from_str("{}").expect("config");
    assert_eq!(config.telegram.polling_timeout, DEFAULT_POLLING_TIMEOUT_SECS);
    assert_eq!(config.telegram.max_workers, DEFAULT_MAX_WORKERS);
    assert_eq!(config.index.search_limit, 10);
    assert_eq!(config.log_level, "debug");
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = OhmytimeConfig::load_from_str("{ unexpected: true }").unwrap_err();
    assert!(format!("{err}").contains("unknown field"));
}

/// Zero workers would leave the stream without consumers.
#[test]
fn rejects_zero_workers() {
    let err = OhmytimeConfig::load_from_str("{ telegram: { max_workers: 0 } }").unwrap_err();
    assert!(format!("{err}").contains("telegram.max_workers"));
}

/// Load a JSON5 file from disk.
#[test]
fn loads_config_from_path() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    fs::write(
        &path,
        "{ index: { path: \"/data/cities.txt\", search_limit: 5 }, // trailing comment\n }",
    )
    .expect("write");

    let config = OhmytimeConfig::load(Some(&path)).expect("config");
    assert_eq!(config.index.path, "/data/cities.txt");
    assert_eq!(config.index.search_limit, 5);
}

/// Polling timeout and worker count are read from distinct variables.
#[test]
fn polling_timeout_and_workers_are_independent() {
    let mut config = OhmytimeConfig::default();
    config
        .apply_env(env_from(&[(env_keys::TELEGRAM_POLLING_TIMEOUT, "30")]))
        .expect("env");
    assert_eq!(config.telegram.polling_timeout, 30);
    assert_eq!(config.telegram.max_workers, DEFAULT_MAX_WORKERS);

    config
        .apply_env(env_from(&[(env_keys::TELEGRAM_MAX_WORKERS, "3")]))
        .expect("env");
    assert_eq!(config.telegram.polling_timeout, 30);
    assert_eq!(config.telegram.max_workers, 3);
}

/// Environment values override file values.
#[test]
fn env_overrides_file_values() {
    let mut config =
        OhmytimeConfig::load_from_str("{ telegram: { token: \"file\" }, log_level: \"info\" }")
            .expect("config");
    config
        .apply_env(env_from(&[
            (env_keys::TELEGRAM_TOKEN, "env-token"),
            (env_keys::PATH_TO_INDEX, "/srv/index.txt"),
            (env_keys::LOG_LEVEL, "warn"),
            (env_keys::TELEGRAM_API_URL, ""),
        ]))
        .expect("env");
    assert_eq!(config.telegram.token, "env-token");
    assert_eq!(config.index.path, "/srv/index.txt");
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.telegram.api_url, crate::DEFAULT_API_URL);
}

/// Non-numeric values are reported with the variable name.
#[test]
fn rejects_non_numeric_env_value() {
    let mut config = OhmytimeConfig::default();
    let err = config
        .apply_env(env_from(&[(env_keys::TELEGRAM_MAX_WORKERS, "many")]))
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("TELEGRAM_MAX_WORKERS"));
    assert!(msg.contains("many"));
}

/// A missing token is only fatal when the bot is about to run.
#[test]
fn ensure_runnable_requires_token() {
    let mut config = OhmytimeConfig::default();
    assert!(config.validate().is_ok());
    let err = config.ensure_runnable().unwrap_err();
    assert!(format!("{err}").contains("TELEGRAM_TOKEN"));

    config.telegram.token = "123:abc".to_string();
    assert!(config.ensure_runnable().is_ok());
}
