//! # Local Overlay
//!
//! Client-only soft deletion. The ledger has no delete operation, so hidden
//! ids are kept here and filtered out of every fetch result.

use super::entities::QuoteRecord;
use std::collections::HashSet;

/// Set of locally hidden quote ids. Append-only for the session.
///
/// Keyed by id alone, not by scope: a quote hidden while browsing one address
/// stays hidden under any other scope that surfaces the same id.
#[derive(Clone, Debug, Default)]
pub struct LocalOverlay {
    deleted_ids: HashSet<String>,
}

impl LocalOverlay {
    /// Empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide `id`. Returns `false` if it was already hidden.
    pub fn mark_deleted(&mut self, id: &str) -> bool {
        self.deleted_ids.insert(id.to_string())
    }

    /// Is `id` hidden?
    pub fn is_deleted(&self, id: &str) -> bool {
        self.deleted_ids.contains(id)
    }

    /// Drop every record whose id is hidden. Survivors are passed through untouched.
    pub fn apply(&self, records: Vec<QuoteRecord>) -> Vec<QuoteRecord> {
        if self.deleted_ids.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|r| !self.deleted_ids.contains(&r.id))
            .collect()
    }

    /// Number of hidden ids.
    pub fn len(&self) -> usize {
        self.deleted_ids.len()
    }

    /// No ids hidden?
    pub fn is_empty(&self) -> bool {
        self.deleted_ids.is_empty()
    }
}
