use super::Item;

/// The pipeline's unit of work: one item instance owned by one customer.
///
/// Two tickets for equal (owner, item) pairs share an item-instance key; the
/// stages treat keys as a multiset and the `serial` keeps log lines and
/// identities apart. The owning session is resolved through the session
/// registry at notification time, so the ticket itself outlives the session
/// that created it (it becomes orphaned, and a later matching order may
/// reclaim it from the tray).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTicket {
    /// Customer id that owns this item instance.
    pub owner: u64,
    /// Process-wide monotonic serial, assigned at mint time.
    pub serial: u64,
    pub item: Item,
}

impl OrderTicket {
    /// Item-instance key, `"<owner id>:<quantity> <category>"`.
    pub fn key(&self) -> String {
        Self::key_for(self.owner, &self.item)
    }

    /// Key a given owner/item pair would carry, without minting a ticket.
    pub fn key_for(owner: u64, item: &Item) -> String {
        format!("{}:{}", owner, item)
    }
}
