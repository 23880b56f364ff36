use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

use crate::order::Category;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cafe: CafeConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8888
}

/// Cafe pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CafeConfig {
    /// Maximum concurrently served customer sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Size of the brew worker pool.
    #[serde(default = "default_brew_workers")]
    pub brew_workers: usize,

    /// Brew slots per category; brewing never holds more of one category.
    #[serde(default = "default_per_category_capacity")]
    pub per_category_capacity: usize,

    /// How long the scheduler pauses after requeueing a saturated item
    /// (milliseconds).
    #[serde(default = "default_saturation_backoff_ms")]
    pub saturation_backoff_ms: u64,

    /// Tea brew duration (milliseconds).
    #[serde(default = "default_tea_brew_ms")]
    pub tea_brew_ms: u64,

    /// Coffee brew duration (milliseconds).
    #[serde(default = "default_coffee_brew_ms")]
    pub coffee_brew_ms: u64,

    /// Interval between cafe status log lines (seconds, 0 disables).
    #[serde(default = "default_stats_interval_secs")]
    pub stats_interval_secs: u64,
}

fn default_max_sessions() -> usize {
    10
}

fn default_brew_workers() -> usize {
    4
}

fn default_per_category_capacity() -> usize {
    2
}

fn default_saturation_backoff_ms() -> u64 {
    100
}

fn default_tea_brew_ms() -> u64 {
    30_000
}

fn default_coffee_brew_ms() -> u64 {
    45_000
}

fn default_stats_interval_secs() -> u64 {
    1
}

impl Default for CafeConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            brew_workers: default_brew_workers(),
            per_category_capacity: default_per_category_capacity(),
            saturation_backoff_ms: default_saturation_backoff_ms(),
            tea_brew_ms: default_tea_brew_ms(),
            coffee_brew_ms: default_coffee_brew_ms(),
            stats_interval_secs: default_stats_interval_secs(),
        }
    }
}

impl CafeConfig {
    /// Brew duration for a category.
    pub fn brew_duration(&self, category: Category) -> Duration {
        match category {
            Category::Tea => Duration::from_millis(self.tea_brew_ms),
            Category::Coffee => Duration::from_millis(self.coffee_brew_ms),
        }
    }

    pub fn saturation_backoff(&self) -> Duration {
        Duration::from_millis(self.saturation_backoff_ms)
    }
}
