//! The order scheduler: sole consumer of the waiting stage.
//!
//! Dequeues the head of waiting and dispatches it to the brew pool when the
//! item's category has a free slot; otherwise the item goes back to the
//! tail and the loop pauses briefly. Head-of-line blocking applies within a
//! saturated category, while a non-saturated category behind it still makes
//! progress through the requeue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::brewer::BrewPool;
use crate::config::CafeConfig;
use crate::pipeline::CafeState;

pub struct Scheduler {
    state: Arc<CafeState>,
    pool: Arc<BrewPool>,
    backoff: Duration,

    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Scheduler {
    pub fn new(state: Arc<CafeState>, pool: Arc<BrewPool>, config: &CafeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            state,
            pool,
            backoff: config.saturation_backoff(),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Start the scheduler loop (spawns a background task).
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Scheduler already running");
            return;
        }

        let state = Arc::clone(&self.state);
        let pool = Arc::clone(&self.pool);
        let backoff = self.backoff;
        let running = Arc::clone(&self.running);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Order scheduler started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Order scheduler received shutdown signal");
                        break;
                    }
                    ticket = state.waiting.dequeue() => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }

                        let category = ticket.item.category;
                        if state.capacity.try_acquire(category) {
                            debug!(key = %ticket.key(), "dispatching brew job");
                            pool.submit(ticket);
                        } else {
                            // Saturated: back to the tail, pause, retry.
                            state.waiting.enqueue(ticket).await;
                            tokio::time::sleep(backoff).await;
                        }
                    }
                }
            }
            info!("Order scheduler stopped");
        });
    }

    /// Stop the scheduler. The loop observes the flag at its next boundary;
    /// in-flight brews are left to the pool.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Scheduler not running");
            return;
        }
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}
