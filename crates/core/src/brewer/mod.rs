//! Brewing: the brew seam and the bounded worker pool.

mod pool;

pub use pool::BrewPool;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::CafeConfig;
use crate::order::Item;

/// Errors from a brew attempt.
#[derive(Debug, Error)]
pub enum BrewError {
    #[error("brew failed: {0}")]
    Failed(String),
}

/// The actual brewing of one item. The pool owns scheduling, stage
/// transitions, and notification; implementations only take the time (or
/// fail).
#[async_trait]
pub trait Brewer: Send + Sync {
    async fn brew(&self, item: &Item) -> Result<(), BrewError>;
}

/// Production brewer: sleeps the configured per-category duration.
#[derive(Debug, Clone)]
pub struct KettleBrewer {
    tea: Duration,
    coffee: Duration,
}

impl KettleBrewer {
    pub fn from_config(config: &CafeConfig) -> Self {
        Self {
            tea: Duration::from_millis(config.tea_brew_ms),
            coffee: Duration::from_millis(config.coffee_brew_ms),
        }
    }

    fn duration_for(&self, item: &Item) -> Duration {
        match item.category {
            crate::order::Category::Tea => self.tea,
            crate::order::Category::Coffee => self.coffee,
        }
    }
}

#[async_trait]
impl Brewer for KettleBrewer {
    async fn brew(&self, item: &Item) -> Result<(), BrewError> {
        tokio::time::sleep(self.duration_for(item)).await;
        Ok(())
    }
}
