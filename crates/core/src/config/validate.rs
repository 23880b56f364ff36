use super::{types::Config, ConfigError};

/// Reject configurations that parse but describe a cafe that cannot run:
/// - port 0 (nothing to bind)
/// - an empty session or brew worker pool
/// - zero brew slots per category (no order could ever be dispatched)
/// - a zero saturation backoff (the scheduler would busy-spin while a
///   category is full)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Invalid("server.port cannot be 0".to_string()));
    }

    if config.cafe.max_sessions == 0 {
        return Err(ConfigError::Invalid(
            "cafe.max_sessions must be at least 1".to_string(),
        ));
    }

    if config.cafe.brew_workers == 0 {
        return Err(ConfigError::Invalid(
            "cafe.brew_workers must be at least 1".to_string(),
        ));
    }

    if config.cafe.per_category_capacity == 0 {
        return Err(ConfigError::Invalid(
            "cafe.per_category_capacity must be at least 1".to_string(),
        ));
    }

    if config.cafe.saturation_backoff_ms == 0 {
        return Err(ConfigError::Invalid(
            "cafe.saturation_backoff_ms must be at least 1".to_string(),
        ));
    }

    Ok(())
}
