//! # Inbound Ports
//!
//! API trait defining what the quote board offers to a front end.

use crate::domain::{
    Address, Drafts, FetchOutcome, InitializationState, MutationReceipt, QuoteDraft, QuoteError,
    QuoteRecord, ViewScope,
};
use async_trait::async_trait;

/// Quote board API - inbound port.
#[async_trait]
pub trait QuoteBoardApi: Send + Sync {
    /// Fetch all quotes for `scope` and, if it is still the active scope when
    /// the response arrives, make them the store contents.
    async fn fetch(&self, scope: ViewScope) -> Result<FetchOutcome, QuoteError>;

    /// Refetch the active scope.
    async fn refresh(&self) -> Result<FetchOutcome, QuoteError>;

    /// Switch to the searched address, or to the own view on blank input.
    ///
    /// Invalid input is rejected and leaves scope and store untouched.
    async fn set_scope(&self, input: &str) -> Result<FetchOutcome, QuoteError>;

    /// Same as `set_scope("")`.
    async fn clear_scope(&self) -> Result<FetchOutcome, QuoteError>;

    /// Hide a quote locally. Returns `false` if it was already hidden.
    fn mark_deleted(&self, id: &str) -> Result<bool, QuoteError>;

    /// Create the identity's quote resource if that has not been tried yet.
    async fn ensure_initialized(&self) -> Result<InitializationState, QuoteError>;

    /// Submit a new quote and refetch once it is confirmed.
    async fn add_quote(
        &self,
        draft: QuoteDraft,
        is_custom: bool,
    ) -> Result<MutationReceipt, QuoteError>;

    /// Toggle the caller's like on `(owner, id)` and refetch once confirmed.
    async fn toggle_like(&self, owner: &Address, id: &str) -> Result<MutationReceipt, QuoteError>;

    /// Pull a quote from the random source into the random draft.
    async fn fetch_random_quote(&self) -> Result<QuoteDraft, QuoteError>;

    /// Current store contents, newest first.
    fn quotes(&self) -> Vec<QuoteRecord>;

    /// Active scope.
    fn active_scope(&self) -> ViewScope;

    /// Current drafts.
    fn drafts(&self) -> Drafts;

    /// Is any remote operation in flight?
    fn is_loading(&self) -> bool;
}
