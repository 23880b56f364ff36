use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::CafeConfig;
use crate::order::{Category, Item, OrderTicket};

use super::{Brewing, Capacity, Tray, Waiting};

/// Process-wide cafe state: the three pipeline stages, the capacity
/// counters, and the customer registries.
///
/// One instance is shared by the acceptor, every session handler, the
/// scheduler, and the brew workers. No caller ever holds two of the inner
/// locks at once.
#[derive(Debug)]
pub struct CafeState {
    pub waiting: Waiting,
    pub brewing: Brewing,
    pub tray: Tray,
    pub capacity: Capacity,

    /// Currently connected customers, owner id -> display name.
    active: RwLock<HashMap<u64, String>>,
    /// Customers that have collected everything they ordered.
    idle: RwLock<HashMap<u64, String>>,
    connected: AtomicUsize,
    next_serial: AtomicU64,
}

/// Point-in-time view of the cafe, consumed by the stats ticker.
#[derive(Debug, Clone, Serialize)]
pub struct CafeSnapshot {
    pub connected_clients: usize,
    pub waiting: usize,
    pub brewing: usize,
    pub tea_brewing: usize,
    pub coffee_brewing: usize,
    pub tray: usize,
    pub idle_customers: usize,
}

impl CafeState {
    pub fn new(config: &CafeConfig) -> Self {
        Self {
            waiting: Waiting::new(),
            brewing: Brewing::new(),
            tray: Tray::new(),
            capacity: Capacity::new(config.per_category_capacity),
            active: RwLock::new(HashMap::new()),
            idle: RwLock::new(HashMap::new()),
            connected: AtomicUsize::new(0),
            next_serial: AtomicU64::new(1),
        }
    }

    /// Create a ticket for `owner`, assigning the next serial.
    pub fn mint_ticket(&self, owner: u64, item: Item) -> OrderTicket {
        OrderTicket {
            owner,
            serial: self.next_serial.fetch_add(1, Ordering::Relaxed),
            item,
        }
    }

    /// Register a connecting customer. Returns false when the id is already
    /// held by a connected session, in which case nothing is recorded.
    pub async fn register_active(&self, id: u64, name: &str) -> bool {
        let mut active = self.active.write().await;
        if active.contains_key(&id) {
            return false;
        }
        active.insert(id, name.to_string());
        true
    }

    /// Remove a customer from both registries on session end.
    pub async fn deregister(&self, id: u64) {
        self.active.write().await.remove(&id);
        self.idle.write().await.remove(&id);
    }

    pub async fn is_active(&self, id: u64) -> bool {
        self.active.read().await.contains_key(&id)
    }

    /// Owner ids of currently connected sessions.
    pub async fn active_ids(&self) -> HashSet<u64> {
        self.active.read().await.keys().copied().collect()
    }

    pub async fn mark_idle(&self, id: u64, name: &str) {
        self.idle.write().await.insert(id, name.to_string());
    }

    pub async fn clear_idle(&self, id: u64) {
        self.idle.write().await.remove(&id);
    }

    pub fn client_connected(&self) {
        self.connected.fetch_add(1, Ordering::AcqRel);
    }

    pub fn client_disconnected(&self) {
        let _ = self
            .connected
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    pub fn connected_clients(&self) -> usize {
        self.connected.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> CafeSnapshot {
        CafeSnapshot {
            connected_clients: self.connected_clients(),
            waiting: self.waiting.len().await,
            brewing: self.brewing.len().await,
            tea_brewing: self.capacity.in_use(Category::Tea),
            coffee_brewing: self.capacity.in_use(Category::Coffee),
            tray: self.tray.len().await,
            idle_customers: self.idle.read().await.len(),
        }
    }
}
