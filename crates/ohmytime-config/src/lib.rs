//! Configuration models and loading for the ohmytime bot.
//!
//! Settings come from an optional JSON5 file and are then overridden by
//! environment variables, so a container deployment can run without a file.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Environment variable names and default file location used by the loader.
pub use loader::{default_user_config_path, env_keys};
/// Configuration schema models.
pub use model::*;
