use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::order::OrderTicket;
use crate::pipeline::CafeState;
use crate::session::SessionRegistry;

use super::Brewer;

/// Bounded pool executing brew jobs dispatched by the scheduler.
///
/// The scheduler has already claimed the category's capacity slot when it
/// submits; the pool brews, moves the ticket brewing -> tray, releases the
/// slot, and notifies the owner. The tray enqueue happens before the
/// brewing remove so no observer sees the item in neither stage.
pub struct BrewPool {
    state: Arc<CafeState>,
    registry: Arc<SessionRegistry>,
    brewer: Arc<dyn Brewer>,
    workers: Arc<Semaphore>,
}

impl BrewPool {
    pub fn new(
        state: Arc<CafeState>,
        registry: Arc<SessionRegistry>,
        brewer: Arc<dyn Brewer>,
        workers: usize,
    ) -> Self {
        Self {
            state,
            registry,
            brewer,
            workers: Arc::new(Semaphore::new(workers)),
        }
    }

    /// Run the brew job for `ticket` on the pool. Returns immediately; the
    /// job waits for a free worker, then brews.
    ///
    /// The caller must hold a capacity slot for the ticket's category; the
    /// job releases it on every path out.
    pub fn submit(&self, ticket: OrderTicket) {
        let state = Arc::clone(&self.state);
        let registry = Arc::clone(&self.registry);
        let brewer = Arc::clone(&self.brewer);
        let workers = Arc::clone(&self.workers);

        tokio::spawn(async move {
            let category = ticket.item.category;

            let Ok(_permit) = workers.acquire_owned().await else {
                // Pool shut down mid-dispatch; the brew is abandoned.
                state.capacity.release(category);
                return;
            };

            let key = ticket.key();
            state.brewing.insert(&key).await;
            debug!(key = %key, "barista started to brew");

            match brewer.brew(&ticket.item).await {
                Ok(()) => {
                    let owner = ticket.owner;
                    let description = ticket.item.to_string();

                    state.tray.enqueue(ticket).await;
                    state.brewing.remove(&key).await;
                    state.capacity.release(category);
                    info!(key = %key, "order ready for pickup in tray");

                    let text = format!("Your {} is ready for pickup!", description);
                    if !registry.notify(owner, &text).await {
                        debug!(owner, "owner not connected, ticket left for reclamation");
                    }
                }
                Err(e) => {
                    // The ticket is dropped, but the stage and the slot are
                    // always restored.
                    warn!(key = %key, "error brewing order: {}", e);
                    state.brewing.remove(&key).await;
                    state.capacity.release(category);
                }
            }
        });
    }

    /// Stop accepting new brew jobs. Jobs already holding a worker finish;
    /// queued jobs release their capacity slot and exit.
    pub fn close(&self) {
        self.workers.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CafeConfig;
    use crate::order::{Category, Item};
    use crate::testing::MockBrewer;
    use std::time::Duration;

    struct Harness {
        state: Arc<CafeState>,
        registry: Arc<SessionRegistry>,
        brewer: MockBrewer,
        pool: BrewPool,
    }

    impl Harness {
        fn new() -> Self {
            let state = Arc::new(CafeState::new(&CafeConfig::default()));
            let registry = Arc::new(SessionRegistry::new());
            let brewer = MockBrewer::new();
            let pool = BrewPool::new(
                Arc::clone(&state),
                Arc::clone(&registry),
                Arc::new(brewer.clone()),
                4,
            );
            Self {
                state,
                registry,
                brewer,
                pool,
            }
        }

        fn submit(&self, owner: u64, qty: u32, category: Category) -> String {
            let item = Item::new(qty, category).unwrap();
            let ticket = self.state.mint_ticket(owner, item);
            let key = ticket.key();
            assert!(self.state.capacity.try_acquire(category));
            self.pool.submit(ticket);
            key
        }
    }

    async fn wait_until<F, Fut>(mut cond: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !cond().await {
            assert!(
                tokio::time::Instant::now() < deadline,
                "condition not met in time"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_successful_brew_lands_in_tray() {
        let h = Harness::new();
        let key = h.submit(1, 1, Category::Tea);

        wait_until(|| async { h.state.tray.contains_key(&key).await }).await;
        assert!(!h.state.brewing.contains(&key).await);
        assert_eq!(h.state.capacity.in_use(Category::Tea), 0);
        assert_eq!(h.brewer.brew_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_brew_drops_ticket_and_restores_capacity() {
        let h = Harness::new();
        h.brewer.fail_category(Category::Coffee);
        let key = h.submit(1, 1, Category::Coffee);

        wait_until(|| async { h.state.capacity.in_use(Category::Coffee) == 0 }).await;
        assert!(!h.state.brewing.contains(&key).await);
        assert!(h.state.tray.is_empty().await);
    }

    #[tokio::test]
    async fn test_notification_dropped_for_disconnected_owner() {
        let h = Harness::new();
        // No session registered for owner 9; the brew must still complete.
        let key = h.submit(9, 1, Category::Tea);

        wait_until(|| async { h.state.tray.contains_key(&key).await }).await;
        assert!(h.registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_closed_pool_abandons_job_but_frees_slot() {
        let h = Harness::new();
        h.brewer.set_brew_duration(Duration::from_secs(10));
        h.pool.close();

        let key = h.submit(1, 1, Category::Tea);
        wait_until(|| async { h.state.capacity.in_use(Category::Tea) == 0 }).await;
        assert!(!h.state.brewing.contains(&key).await);
        assert!(h.state.tray.is_empty().await);
    }
}
