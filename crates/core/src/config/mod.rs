//! Cafe configuration: an optional TOML file with `BARISTA_`-prefixed
//! environment overrides, validated before the cafe opens.
//!
//! Everything has a default, so a bare `barista-server` with no config file
//! runs the stock cafe: port 8888, 10 sessions, 4 brew workers, 2 slots per
//! category, 30 s tea / 45 s coffee.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::{CafeConfig, Config, ServerConfig};
pub use validate::validate_config;

use thiserror::Error;

/// Errors raised while loading or checking the cafe configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("config could not be parsed: {0}")]
    Parse(String),

    /// The file parsed but describes a cafe that cannot run (port 0, empty
    /// worker pool, zero capacity, busy-spinning scheduler).
    #[error("invalid cafe configuration: {0}")]
    Invalid(String),
}
