use crate::types::Violation;

/// Insertion-ordered queue of flagged transactions awaiting review.
///
/// Records are unique by `id`; lookup also matches `transaction_id` so
/// operators can act on either key. Resolution removes the record outright,
/// so everything held here is active by definition.
#[derive(Debug, Default)]
pub struct ViolationQueue {
    records: Vec<Violation>,
}

impl ViolationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// All active records in arrival order.
    pub fn list_active(&self) -> Vec<Violation> {
        self.records.clone()
    }

    /// First record matching `identifier` by `id` or `transaction_id`.
    pub fn find(&self, identifier: &str) -> Option<&Violation> {
        self.records.iter().find(|v| v.matches(identifier))
    }

    pub fn find_mut(&mut self, identifier: &str) -> Option<&mut Violation> {
        self.records.iter_mut().find(|v| v.matches(identifier))
    }

    /// Insert a record, or replace the existing one with the same `id`
    /// in place (queue position is preserved).
    pub fn upsert(&mut self, record: Violation) {
        match self.records.iter_mut().find(|v| v.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Delete the matching record. Unknown identifiers are a no-op.
    pub fn remove(&mut self, identifier: &str) -> bool {
        match self.records.iter().position(|v| v.matches(identifier)) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_preserves_insertion_order() {
        let mut queue = ViolationQueue::new();
        queue.upsert(Violation::flagged("TX1"));
        queue.upsert(Violation::flagged("TX2"));
        queue.upsert(Violation::flagged("TX3"));

        let ids: Vec<_> = queue.list_active().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, ["TX1", "TX2", "TX3"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut queue = ViolationQueue::new();
        queue.upsert(Violation::flagged("TX1"));
        queue.upsert(Violation::flagged("TX2"));

        let mut updated = Violation::flagged("TX1");
        updated.evidence.insert("amount".to_string(), json!(9_800));
        queue.upsert(updated);

        assert_eq!(queue.len(), 2);
        let active = queue.list_active();
        assert_eq!(active[0].id, "TX1");
        assert_eq!(active[0].evidence["amount"], 9_800);
    }

    #[test]
    fn find_matches_either_identifier() {
        let mut queue = ViolationQueue::new();
        let mut record = Violation::flagged("VIOL-7");
        record.transaction_id = "TXN-7734".to_string();
        queue.upsert(record);

        let by_id = queue.find("VIOL-7").expect("lookup by id");
        let by_txn = queue.find("TXN-7734").expect("lookup by transaction id");
        assert_eq!(by_id.id, by_txn.id);
    }

    #[test]
    fn remove_unknown_is_a_no_op() {
        let mut queue = ViolationQueue::new();
        queue.upsert(Violation::flagged("TX1"));

        assert!(!queue.remove("TX-MISSING"));
        assert_eq!(queue.len(), 1);
        assert!(queue.remove("TX1"));
        assert!(queue.is_empty());
    }
}
