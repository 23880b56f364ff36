//! Periodic cafe status line.
//!
//! A projection of the core counters for operators watching the log; it
//! reads the shared state and contributes nothing to it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use barista_core::CafeState;

/// Log a status line every `interval_secs`. Returns `None` (no task) when
/// the interval is 0.
pub fn spawn_stats_ticker(state: Arc<CafeState>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            let snap = state.snapshot().await;
            info!(
                clients = snap.connected_clients,
                waiting = snap.waiting,
                brewing = snap.brewing,
                tea = snap.tea_brewing,
                coffee = snap.coffee_brewing,
                tray = snap.tray,
                idle = snap.idle_customers,
                "cafe status"
            );
        }
    });
    Some(handle)
}
