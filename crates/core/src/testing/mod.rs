//! Mock implementations for testing.
//!
//! `MockBrewer` replaces the kettle in tests so suites do not sit through
//! real brew durations. Clones share state, so a test can keep a handle
//! while the pool owns another.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::brewer::{BrewError, Brewer};
use crate::order::{Category, Item};

#[derive(Debug, Clone, Default)]
pub struct MockBrewer {
    inner: Arc<MockBrewerInner>,
}

#[derive(Debug, Default)]
struct MockBrewerInner {
    duration: Mutex<Duration>,
    failing: Mutex<HashSet<Category>>,
    brews: AtomicUsize,
}

impl MockBrewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long each mock brew takes (default: instant).
    pub fn set_brew_duration(&self, duration: Duration) {
        *self.inner.duration.lock().unwrap() = duration;
    }

    /// Make every brew of `category` fail.
    pub fn fail_category(&self, category: Category) {
        self.inner.failing.lock().unwrap().insert(category);
    }

    /// Number of brews attempted (successes and failures).
    pub fn brew_count(&self) -> usize {
        self.inner.brews.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Brewer for MockBrewer {
    async fn brew(&self, item: &Item) -> Result<(), BrewError> {
        self.inner.brews.fetch_add(1, Ordering::SeqCst);

        let duration = *self.inner.duration.lock().unwrap();
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        if self.inner.failing.lock().unwrap().contains(&item.category) {
            return Err(BrewError::Failed(format!(
                "mock kettle refuses to brew {}",
                item.category
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_brewer_counts_and_fails_on_demand() {
        let brewer = MockBrewer::new();
        let tea = Item::new(1, Category::Tea).unwrap();
        let coffee = Item::new(1, Category::Coffee).unwrap();

        brewer.fail_category(Category::Coffee);

        assert!(brewer.brew(&tea).await.is_ok());
        assert!(brewer.brew(&coffee).await.is_err());
        assert_eq!(brewer.brew_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let brewer = MockBrewer::new();
        let clone = brewer.clone();
        let tea = Item::new(1, Category::Tea).unwrap();

        clone.brew(&tea).await.unwrap();
        assert_eq!(brewer.brew_count(), 1);
    }
}
