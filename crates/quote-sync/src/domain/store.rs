//! # Quote Store
//!
//! In-memory collection of quotes for the address currently in view.

use super::entities::QuoteRecord;
use super::invariants::{invariant_newest_first, invariant_unique_keys};

/// Records derived from the last applied fetch, minus overlay deletions.
#[derive(Clone, Debug, Default)]
pub struct QuoteStore {
    /// Newest first.
    records: Vec<QuoteRecord>,
    /// Number of fetches applied since creation.
    applied: u64,
}

impl QuoteStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly fetched collection in one step.
    ///
    /// `records` must already be sorted newest first, filtered through the
    /// overlay, and free of duplicate `(owner, id)` keys.
    pub fn replace(&mut self, records: Vec<QuoteRecord>) {
        debug_assert!(invariant_newest_first(&records));
        debug_assert!(invariant_unique_keys(&records));
        self.records = records;
        self.applied += 1;
    }

    /// Remove every record with `id`. Returns how many were removed.
    pub fn remove_id(&mut self, id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before - self.records.len()
    }

    /// Forget contents (scope or identity changed).
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Current records, newest first.
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Number of fetches applied so far.
    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    /// Record count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Nothing stored?
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
