use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `BARISTA_SERVER_PORT=9000`.
const ENV_PREFIX: &str = "BARISTA_";

/// Read the cafe configuration from a TOML file, letting `BARISTA_`-prefixed
/// environment variables override individual keys on top.
///
/// Both the `[server]` and `[cafe]` sections are optional and so is every
/// key within them; anything absent falls back to the defaults baked into
/// [`Config`]. A missing file is an error here so the caller can tell
/// "no file, use defaults" apart from a typoed path.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("_"))
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Parse a configuration straight from TOML text, without the environment
/// layer. Tests use this to spin up cafes with millisecond brew durations.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
}
