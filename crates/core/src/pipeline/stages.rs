//! Stage containers: waiting, brewing, and tray.

use std::collections::{HashMap, VecDeque};

use tokio::sync::{Mutex, Notify};

use crate::order::OrderTicket;

/// FIFO queue of tickets waiting for a brew slot. Unbounded.
///
/// The scheduler is the sole consumer; session handlers enqueue, and the
/// scheduler re-enqueues at the tail when the head's category is saturated.
#[derive(Debug, Default)]
pub struct Waiting {
    queue: Mutex<VecDeque<OrderTicket>>,
    notify: Notify,
}

impl Waiting {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enqueue(&self, ticket: OrderTicket) {
        self.queue.lock().await.push_back(ticket);
        self.notify.notify_one();
    }

    /// Remove and return the head, waiting until a ticket is available.
    pub async fn dequeue(&self) -> OrderTicket {
        loop {
            // Arm the notification before checking the queue so an enqueue
            // between the check and the await is not missed.
            let notified = self.notify.notified();
            if let Some(ticket) = self.queue.lock().await.pop_front() {
                return ticket;
            }
            notified.await;
        }
    }

    /// Best-effort membership test by item-instance key.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.queue.lock().await.iter().any(|t| t.key() == key)
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}

/// Item-instance keys currently brewing, with multiset semantics: a customer
/// ordering two equal items holds two entries under one key. A present key
/// means "currently brewing"; nothing else is stored.
#[derive(Debug, Default)]
pub struct Brewing {
    counts: Mutex<HashMap<String, usize>>,
}

impl Brewing {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, key: &str) {
        *self.counts.lock().await.entry(key.to_string()).or_insert(0) += 1;
    }

    pub async fn remove(&self, key: &str) {
        let mut counts = self.counts.lock().await;
        if let Some(n) = counts.get_mut(key) {
            *n -= 1;
            if *n == 0 {
                counts.remove(key);
            }
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.counts.lock().await.contains_key(key)
    }

    /// Total item instances brewing, across all keys.
    pub async fn len(&self) -> usize {
        self.counts.lock().await.values().sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.counts.lock().await.is_empty()
    }
}

/// Completed tickets awaiting pickup, in completion order.
#[derive(Debug, Default)]
pub struct Tray {
    queue: Mutex<VecDeque<OrderTicket>>,
}

impl Tray {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enqueue(&self, ticket: OrderTicket) {
        self.queue.lock().await.push_back(ticket);
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.queue.lock().await.iter().any(|t| t.key() == key)
    }

    /// Number of tickets matching `key`.
    pub async fn count_matching(&self, key: &str) -> usize {
        self.queue.lock().await.iter().filter(|t| t.key() == key).count()
    }

    /// Remove the oldest ticket satisfying `pred`, if any.
    pub async fn remove_first_where<F>(&self, pred: F) -> Option<OrderTicket>
    where
        F: Fn(&OrderTicket) -> bool,
    {
        let mut queue = self.queue.lock().await;
        let idx = queue.iter().position(|t| pred(t))?;
        queue.remove(idx)
    }

    /// All-or-nothing pickup: for each key, remove exactly the requested
    /// number of matching tickets. If any key falls short the tray is left
    /// untouched and false is returned. Runs under a single lock so a
    /// concurrent observer never sees a partial pickup.
    pub async fn take_exact(&self, wanted: &HashMap<String, usize>) -> bool {
        let mut queue = self.queue.lock().await;

        for (key, count) in wanted {
            if queue.iter().filter(|t| t.key() == *key).count() < *count {
                return false;
            }
        }

        for (key, count) in wanted {
            for _ in 0..*count {
                if let Some(idx) = queue.iter().position(|t| t.key() == *key) {
                    queue.remove(idx);
                }
            }
        }
        true
    }

    /// Copy of the tray contents, oldest first.
    pub async fn snapshot(&self) -> Vec<OrderTicket> {
        self.queue.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Category, Item};
    use std::sync::Arc;
    use std::time::Duration;

    fn ticket(owner: u64, serial: u64, qty: u32, category: Category) -> OrderTicket {
        OrderTicket {
            owner,
            serial,
            item: Item::new(qty, category).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_waiting_is_fifo() {
        let waiting = Waiting::new();
        waiting.enqueue(ticket(1, 1, 1, Category::Tea)).await;
        waiting.enqueue(ticket(1, 2, 1, Category::Coffee)).await;

        assert_eq!(waiting.dequeue().await.serial, 1);
        assert_eq!(waiting.dequeue().await.serial, 2);
    }

    #[tokio::test]
    async fn test_waiting_dequeue_blocks_until_enqueue() {
        let waiting = Arc::new(Waiting::new());

        let consumer = {
            let waiting = Arc::clone(&waiting);
            tokio::spawn(async move { waiting.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        waiting.enqueue(ticket(1, 1, 1, Category::Tea)).await;
        let got = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("dequeue should complete")
            .unwrap();
        assert_eq!(got.serial, 1);
    }

    #[tokio::test]
    async fn test_waiting_contains_key() {
        let waiting = Waiting::new();
        waiting.enqueue(ticket(5, 1, 1, Category::Tea)).await;
        assert!(waiting.contains_key("5:1 tea").await);
        assert!(!waiting.contains_key("5:1 coffee").await);
    }

    #[tokio::test]
    async fn test_brewing_multiset_counts() {
        let brewing = Brewing::new();
        brewing.insert("1:1 tea").await;
        brewing.insert("1:1 tea").await;
        assert!(brewing.contains("1:1 tea").await);
        assert_eq!(brewing.len().await, 2);

        brewing.remove("1:1 tea").await;
        assert!(brewing.contains("1:1 tea").await);
        brewing.remove("1:1 tea").await;
        assert!(!brewing.contains("1:1 tea").await);
        assert!(brewing.is_empty().await);
    }

    #[tokio::test]
    async fn test_tray_take_exact_all_present() {
        let tray = Tray::new();
        tray.enqueue(ticket(1, 1, 1, Category::Tea)).await;
        tray.enqueue(ticket(1, 2, 1, Category::Coffee)).await;

        let wanted =
            HashMap::from([("1:1 tea".to_string(), 1), ("1:1 coffee".to_string(), 1)]);
        assert!(tray.take_exact(&wanted).await);
        assert!(tray.is_empty().await);
    }

    #[tokio::test]
    async fn test_tray_take_exact_is_all_or_nothing() {
        let tray = Tray::new();
        tray.enqueue(ticket(1, 1, 1, Category::Tea)).await;

        let wanted =
            HashMap::from([("1:1 tea".to_string(), 1), ("1:1 coffee".to_string(), 1)]);
        assert!(!tray.take_exact(&wanted).await);
        // Nothing removed.
        assert_eq!(tray.len().await, 1);
        assert!(tray.contains_key("1:1 tea").await);
    }

    #[tokio::test]
    async fn test_tray_take_exact_respects_duplicate_counts() {
        let tray = Tray::new();
        tray.enqueue(ticket(1, 1, 1, Category::Tea)).await;

        // Two instances wanted, only one on the tray.
        let wanted = HashMap::from([("1:1 tea".to_string(), 2)]);
        assert!(!tray.take_exact(&wanted).await);

        tray.enqueue(ticket(1, 2, 1, Category::Tea)).await;
        assert!(tray.take_exact(&wanted).await);
        assert!(tray.is_empty().await);
    }

    #[tokio::test]
    async fn test_tray_remove_first_where_takes_oldest() {
        let tray = Tray::new();
        tray.enqueue(ticket(1, 1, 1, Category::Tea)).await;
        tray.enqueue(ticket(2, 2, 1, Category::Tea)).await;

        let removed = tray
            .remove_first_where(|t| t.item.category == Category::Tea)
            .await
            .unwrap();
        assert_eq!(removed.serial, 1);
        assert_eq!(tray.len().await, 1);
    }
}
