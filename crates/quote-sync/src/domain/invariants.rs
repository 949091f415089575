//! # Domain Invariants
//!
//! Rules the store contents must satisfy after every applied fetch.

use super::entities::QuoteRecord;
use super::overlay::LocalOverlay;
use std::collections::HashSet;

/// Invariant: records are ordered by `created_at`, newest first.
pub fn invariant_newest_first(records: &[QuoteRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at)
}

/// Invariant: no hidden id is visible.
pub fn invariant_overlay_hidden(records: &[QuoteRecord], overlay: &LocalOverlay) -> bool {
    records.iter().all(|r| !overlay.is_deleted(&r.id))
}

/// Invariant: `(owner, id)` pairs are unique.
pub fn invariant_unique_keys(records: &[QuoteRecord]) -> bool {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().all(|r| seen.insert(r.key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Address;
    use chrono::{TimeZone, Utc};

    fn quote(id: &str, secs: i64) -> QuoteRecord {
        QuoteRecord {
            id: id.into(),
            content: "c".into(),
            author: "a".into(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            like_count: 0,
            liked_by: Default::default(),
            owner: Address::from_hex_literal("0x2").unwrap(),
            is_custom: false,
        }
    }

    #[test]
    fn test_newest_first() {
        assert!(invariant_newest_first(&[]));
        assert!(invariant_newest_first(&[quote("2", 2000), quote("1", 1000)]));
        assert!(!invariant_newest_first(&[quote("1", 1000), quote("2", 2000)]));
    }

    #[test]
    fn test_overlay_hidden() {
        let mut overlay = LocalOverlay::new();
        overlay.mark_deleted("1");
        assert!(invariant_overlay_hidden(&[quote("2", 1)], &overlay));
        assert!(!invariant_overlay_hidden(&[quote("1", 1)], &overlay));
    }

    #[test]
    fn test_unique_keys() {
        assert!(invariant_unique_keys(&[quote("1", 1), quote("2", 1)]));
        assert!(!invariant_unique_keys(&[quote("1", 1), quote("1", 2)]));
    }
}
