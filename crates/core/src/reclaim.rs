//! Abandoned-order reclamation.
//!
//! When a customer disconnects without collecting, their tray tickets stay
//! behind as orphans. A newly arriving matching order takes over such a
//! ticket instead of brewing a fresh one.

use tracing::info;

use crate::order::Item;
use crate::pipeline::CafeState;

/// Try to satisfy `item` for `new_owner` from an orphaned tray ticket.
///
/// Scans the tray for the oldest ticket whose owner is no longer connected
/// and whose item matches exactly; on a hit the orphan is replaced by a
/// fresh ticket owned by `new_owner` and true is returned. The caller must
/// then NOT enqueue the item into waiting. A miss is not an error; the
/// caller falls through to the normal enqueue.
pub async fn reclaim_one(state: &CafeState, new_owner: u64, item: &Item) -> bool {
    let active = state.active_ids().await;

    let orphan = state
        .tray
        .remove_first_where(|t| t.item == *item && !active.contains(&t.owner))
        .await;

    let Some(orphan) = orphan else {
        return false;
    };

    let replacement = state.mint_ticket(new_owner, *item);
    info!(
        previous_owner = orphan.owner,
        new_owner,
        item = %item,
        "reassigning abandoned order"
    );
    state.tray.enqueue(replacement).await;
    true
}
