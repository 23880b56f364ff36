use std::sync::atomic::{AtomicUsize, Ordering};

use crate::order::Category;

/// Per-category brew-slot counters with a fixed ceiling.
///
/// The scheduler acquires a slot before dispatching a brew job and the
/// worker releases it when the job leaves the brewing stage, on the success
/// and failure paths alike. Acquisition is a compare-and-swap against the
/// ceiling, so the bound holds at every observation point.
#[derive(Debug)]
pub struct Capacity {
    ceiling: usize,
    tea: AtomicUsize,
    coffee: AtomicUsize,
}

impl Capacity {
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            tea: AtomicUsize::new(0),
            coffee: AtomicUsize::new(0),
        }
    }

    fn slot(&self, category: Category) -> &AtomicUsize {
        match category {
            Category::Tea => &self.tea,
            Category::Coffee => &self.coffee,
        }
    }

    /// Claim a brew slot for `category`. Returns false when the category is
    /// saturated; the caller is expected to requeue and retry later.
    pub fn try_acquire(&self, category: Category) -> bool {
        self.slot(category)
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.ceiling).then_some(n + 1)
            })
            .is_ok()
    }

    /// Return a slot claimed by `try_acquire`. Saturating: releasing an
    /// unclaimed slot is a logic error upstream but never underflows.
    pub fn release(&self, category: Category) {
        let _ = self
            .slot(category)
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Slots currently claimed for `category`.
    pub fn in_use(&self, category: Category) -> usize {
        self.slot(category).load(Ordering::Acquire)
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }
}
