//! Property tests for local soft-deletion.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use quote_sync::domain::{invariant_newest_first, invariant_overlay_hidden};
use quote_sync::{
    sort_newest_first, Address, LocalOverlay, MockLedger, QuoteBoardApi, QuoteBoardService,
    QuoteRecord, QuoteSyncConfig, WalletIdentity,
};
use serde_json::json;

fn owner() -> Address {
    Address::parse(&format!("0x{}", "d".repeat(64))).unwrap()
}

fn record(id: u8, created_at: u32) -> QuoteRecord {
    QuoteRecord {
        id: id.to_string(),
        content: format!("quote {id}"),
        author: "Anon".to_string(),
        created_at: Utc.timestamp_opt(i64::from(created_at), 0).unwrap(),
        like_count: 0,
        liked_by: BTreeSet::new(),
        owner: owner(),
        is_custom: false,
    }
}

proptest! {
    #[test]
    fn overlay_hides_marked_and_keeps_the_rest(
        rows in prop::collection::vec((0u8..32, 0u32..10_000), 0..40),
        deleted in prop::collection::vec(0u8..32, 0..10),
    ) {
        let mut overlay = LocalOverlay::new();
        for id in &deleted {
            overlay.mark_deleted(&id.to_string());
        }

        let records: Vec<_> = rows.iter().map(|&(id, at)| record(id, at)).collect();
        let mut visible = overlay.apply(records.clone());
        sort_newest_first(&mut visible);

        prop_assert!(invariant_overlay_hidden(&visible, &overlay));
        prop_assert!(invariant_newest_first(&visible));
        let expected = records.iter().filter(|r| !overlay.is_deleted(&r.id)).count();
        prop_assert_eq!(visible.len(), expected);
    }

    #[test]
    fn fetch_never_surfaces_marked_ids(
        ids in prop::collection::btree_set(0u8..50, 0..20),
        deleted in prop::collection::vec(0u8..50, 0..10),
    ) {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(WalletIdentity::with_address(owner()));
        let board = QuoteBoardService::new(QuoteSyncConfig::for_testing(), ledger.clone(), wallet);
        ledger.set_quotes(
            &owner(),
            ids.iter()
                .map(|id| json!({
                    "id": id.to_string(),
                    "content": "c",
                    "owner": owner().as_str(),
                    "created_at": u64::from(*id),
                }))
                .collect(),
        );

        for id in &deleted {
            board.mark_deleted(&id.to_string()).unwrap();
        }
        tokio_test::block_on(board.refresh()).unwrap();

        let surfaced: BTreeSet<String> = board.quotes().into_iter().map(|q| q.id).collect();
        for id in &deleted {
            prop_assert!(!surfaced.contains(&id.to_string()));
        }
        prop_assert_eq!(
            surfaced.len(),
            ids.iter().filter(|id| !deleted.contains(id)).count()
        );
    }
}
