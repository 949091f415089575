//! # Domain Entities
//!
//! Quote records as held by the local store.

use super::value_objects::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity of a quote. An id is only unique within its owner's collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuoteKey {
    /// Owning address.
    pub owner: Address,
    /// Ledger-assigned id.
    pub id: String,
}

/// A quote as stored on the ledger.
///
/// `content`, `author`, `owner`, `is_custom` and `created_at` never change after
/// creation; `like_count` and `liked_by` change only through toggle-like
/// transactions and are only ever learned from a refetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Ledger-assigned id, opaque to the client.
    pub id: String,
    /// Quote text.
    pub content: String,
    /// Attributed author.
    pub author: String,
    /// Creation time (second precision).
    pub created_at: DateTime<Utc>,
    /// Number of likes.
    pub like_count: u64,
    /// Addresses that currently like this quote.
    pub liked_by: BTreeSet<Address>,
    /// Owning address.
    pub owner: Address,
    /// Composed by hand rather than pulled from the random source.
    pub is_custom: bool,
}

impl QuoteRecord {
    /// Identity key of this record.
    pub fn key(&self) -> QuoteKey {
        QuoteKey {
            owner: self.owner.clone(),
            id: self.id.clone(),
        }
    }

    /// Does `address` currently like this quote?
    pub fn is_liked_by(&self, address: &Address) -> bool {
        self.liked_by.contains(address)
    }

    /// Is this quote owned by `address`?
    pub fn is_owned_by(&self, address: &Address) -> bool {
        &self.owner == address
    }
}
