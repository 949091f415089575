//! # Quote Board Service
//!
//! Application service owning the session state: active scope, quote store,
//! local overlay, drafts and per-identity initialization progress.
//!
//! ## Stale results
//!
//! Every scope or identity change bumps `epoch`. A fetch captures the epoch
//! when it is issued and applies its result only if the epoch and the active
//! scope are unchanged when the view call returns. Locks are released before
//! every remote call.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::coordinator::MutationCoordinator;
use super::notice::{Notice, NoticeBus};
use crate::algorithms::{
    add_quote_payload, decode_view_result, get_all_quotes_request, initialize_payload,
    sort_newest_first, toggle_like_payload,
};
use crate::config::QuoteSyncConfig;
use crate::domain::{
    Address, ConfirmedTransaction, Drafts, EntryFunctionPayload, FetchOutcome,
    InitializationState, LocalOverlay, MutationKind, MutationReceipt, QuoteDraft, QuoteError,
    QuoteRecord, QuoteStore, ViewScope,
};
use crate::ports::{IdentityProvider, LedgerGateway, QuoteBoardApi, RandomQuoteSource};

const NO_QUOTES_FOR_ADDRESS: &str = "There's no quotes available for this address";

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Address>,
    scope: ViewScope,
    epoch: u64,
    store: QuoteStore,
    overlay: LocalOverlay,
    drafts: Drafts,
    init: HashMap<Address, InitializationState>,
}

impl SessionState {
    fn require_identity(&self) -> Result<Address, QuoteError> {
        self.identity.clone().ok_or(QuoteError::NotAuthenticated)
    }
}

/// Decrements the in-flight counter on drop.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Quote board service - reconciles the on-chain quote collection with the
/// local view.
pub struct QuoteBoardService<L: LedgerGateway, I: IdentityProvider> {
    config: QuoteSyncConfig,
    gateway: Arc<L>,
    identity: Arc<I>,
    quote_source: Option<Arc<dyn RandomQuoteSource>>,
    coordinator: MutationCoordinator<L>,
    state: RwLock<SessionState>,
    notices: NoticeBus,
    in_flight: AtomicUsize,
}

impl<L: LedgerGateway, I: IdentityProvider> QuoteBoardService<L, I> {
    /// Create a service. The identity provider's current address becomes the
    /// session identity.
    pub fn new(config: QuoteSyncConfig, gateway: Arc<L>, identity: Arc<I>) -> Self {
        let state = SessionState {
            identity: identity.current(),
            ..SessionState::default()
        };
        Self {
            notices: NoticeBus::new(config.notice_capacity),
            coordinator: MutationCoordinator::new(gateway.clone()),
            config,
            gateway,
            identity,
            quote_source: None,
            state: RwLock::new(state),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Attach a random quote source.
    pub fn with_quote_source(mut self, source: Arc<dyn RandomQuoteSource>) -> Self {
        self.quote_source = Some(source);
        self
    }

    /// Session identity.
    pub fn identity(&self) -> Option<Address> {
        self.state.read().identity.clone()
    }

    /// Initialization progress for `address` in this session.
    pub fn initialization_state(&self, address: &Address) -> InitializationState {
        self.state
            .read()
            .init
            .get(address)
            .copied()
            .unwrap_or_default()
    }

    /// Subscribe to user-visible notices.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Replace the custom draft.
    pub fn set_custom_draft(&self, content: impl Into<String>, author: impl Into<String>) {
        self.state.write().drafts.custom = QuoteDraft::new(content, author);
    }

    /// React to a wallet connect, disconnect or account switch.
    ///
    /// Resets the scope to the own view and forgets store and drafts. With an
    /// identity present, initializes its resource (once per session) and
    /// fetches its quotes.
    pub async fn on_identity_changed(
        &self,
        identity: Option<Address>,
    ) -> Result<Option<FetchOutcome>, QuoteError> {
        {
            let mut state = self.state.write();
            state.identity = identity.clone();
            state.scope = ViewScope::Own;
            state.epoch += 1;
            state.store.clear();
            state.drafts.clear();
        }
        info!(identity = ?identity.as_ref().map(Address::as_str), "Identity changed");

        if identity.is_none() {
            return Ok(None);
        }
        self.initialize(false).await?;
        self.fetch(ViewScope::Own).await.map(Some)
    }

    /// Follow the identity provider until it goes away.
    ///
    /// An identity already connected when the watch starts is synced first.
    pub fn watch_identity(self: &Arc<Self>) -> JoinHandle<()>
    where
        L: 'static,
        I: 'static,
    {
        let service = Arc::clone(self);
        let mut rx = service.identity.subscribe();
        tokio::spawn(async move {
            let initial = rx.borrow_and_update().clone();
            if initial.is_some() {
                if let Err(e) = service.on_identity_changed(initial).await {
                    warn!(error = %e, "Initial identity sync failed");
                }
            }
            while rx.changed().await.is_ok() {
                let identity = rx.borrow_and_update().clone();
                if let Err(e) = service.on_identity_changed(identity).await {
                    warn!(error = %e, "Identity change handling failed");
                }
            }
            debug!("Identity provider closed");
        })
    }

    fn begin(&self) -> LoadingGuard<'_> {
        LoadingGuard::enter(&self.in_flight)
    }

    /// Decode a raw view result. Bad elements are skipped; a bad outer shape
    /// yields nothing.
    fn decode(&self, raw: &Value) -> Vec<QuoteRecord> {
        match decode_view_result(raw) {
            Ok(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable quote");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Undecodable view result, treating as empty");
                Vec::new()
            }
        }
    }

    fn is_current(&self, epoch: u64, scope: &ViewScope) -> bool {
        let state = self.state.read();
        state.epoch == epoch && state.scope == *scope
    }

    fn apply_fetch(
        &self,
        epoch: u64,
        scope: &ViewScope,
        address: Address,
        records: Vec<QuoteRecord>,
    ) -> FetchOutcome {
        let (records, applied) = {
            let mut state = self.state.write();
            if state.epoch != epoch || state.scope != *scope {
                debug!(%scope, epoch, current = state.epoch, "Discarding stale fetch");
                return FetchOutcome::Discarded;
            }
            let mut records = state.overlay.apply(records);
            sort_newest_first(&mut records);
            state.store.replace(records.clone());
            (records, state.store.applied_count())
        };

        info!(address = %address, count = records.len(), applied, "Quotes applied");
        if scope.is_search() {
            if records.is_empty() {
                self.notices.info(NO_QUOTES_FOR_ADDRESS);
            } else {
                self.notices
                    .success(format!("Found {} quotes for the address.", records.len()));
            }
        }
        FetchOutcome::Applied(records)
    }

    /// Run one mutation, reporting failure as an error notice.
    async fn mutate(
        &self,
        kind: MutationKind,
        payload: &EntryFunctionPayload,
        failure: &str,
    ) -> Result<ConfirmedTransaction, QuoteError> {
        let _guard = self.begin();
        self.coordinator.execute(kind, payload).await.map_err(|e| {
            self.notices.error(failure);
            e
        })
    }

    /// Submit the initialization transaction unless already tried for the
    /// session identity. Refetches afterwards only when `refetch` is set and a
    /// transaction was actually confirmed.
    async fn initialize(&self, refetch: bool) -> Result<InitializationState, QuoteError> {
        let identity = {
            let mut state = self.state.write();
            let identity = state.require_identity()?;
            let entry = state.init.entry(identity.clone()).or_default();
            if *entry != InitializationState::NotAttempted {
                return Ok(*entry);
            }
            *entry = InitializationState::Attempted;
            identity
        };

        let payload = initialize_payload(&self.config.module);
        let result = {
            let _guard = self.begin();
            self.coordinator
                .execute(MutationKind::Initialize, &payload)
                .await
        };

        let (outcome, submitted) = match result {
            Ok(_) => (InitializationState::Confirmed, true),
            Err(QuoteError::AlreadyInitialized) => {
                debug!(identity = %identity, "Quote resource already exists");
                (InitializationState::Confirmed, false)
            }
            Err(e) => {
                warn!(identity = %identity, error = %e, "Initialization failed, not retrying");
                (InitializationState::Attempted, false)
            }
        };
        self.state.write().init.insert(identity, outcome);

        if refetch && submitted {
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "Refetch after initialization failed");
            }
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<L: LedgerGateway, I: IdentityProvider> QuoteBoardApi for QuoteBoardService<L, I> {
    async fn fetch(&self, scope: ViewScope) -> Result<FetchOutcome, QuoteError> {
        let (epoch, address) = {
            let state = self.state.read();
            (state.epoch, scope.resolve(state.identity.as_ref())?)
        };

        let request = get_all_quotes_request(&self.config.module, &address);
        debug!(address = %address, epoch, "Fetching quotes");

        let response = {
            let _guard = self.begin();
            self.gateway.view(&request).await
        };

        let records = match response {
            Ok(raw) => self.decode(&raw),
            Err(e) if e.is_remote_absence() => {
                debug!(address = %address, reason = %e, "No quote resource, treating as empty");
                Vec::new()
            }
            Err(e) => {
                if !self.is_current(epoch, &scope) {
                    debug!(address = %address, error = %e, "Stale fetch failed, ignoring");
                    return Ok(FetchOutcome::Discarded);
                }
                let err = QuoteError::from(e);
                warn!(address = %address, error = %err, "Fetch failed");
                self.notices.error("Failed to fetch quotes. Please try again.");
                return Err(err);
            }
        };

        Ok(self.apply_fetch(epoch, &scope, address, records))
    }

    async fn refresh(&self) -> Result<FetchOutcome, QuoteError> {
        let scope = self.active_scope();
        self.fetch(scope).await
    }

    async fn set_scope(&self, input: &str) -> Result<FetchOutcome, QuoteError> {
        let scope = match ViewScope::parse(input) {
            Ok(scope) => scope,
            Err(e) => {
                warn!(input, error = %e, "Rejected scope");
                self.notices.error(e.to_string());
                return Err(e);
            }
        };

        {
            let mut state = self.state.write();
            if state.scope != scope {
                debug!(from = %state.scope, to = %scope, "Scope changed");
                state.scope = scope.clone();
                state.epoch += 1;
                state.store.clear();
                state.drafts.clear();
            }
        }
        self.fetch(scope).await
    }

    async fn clear_scope(&self) -> Result<FetchOutcome, QuoteError> {
        self.set_scope("").await
    }

    fn mark_deleted(&self, id: &str) -> Result<bool, QuoteError> {
        let added = {
            let mut state = self.state.write();
            state.require_identity()?;
            let added = state.overlay.mark_deleted(id);
            state.store.remove_id(id);
            added
        };
        if added {
            debug!(id, "Quote hidden");
            self.notices.success("Quote removed from the list.");
        }
        Ok(added)
    }

    async fn ensure_initialized(&self) -> Result<InitializationState, QuoteError> {
        self.initialize(true).await
    }

    async fn add_quote(
        &self,
        draft: QuoteDraft,
        is_custom: bool,
    ) -> Result<MutationReceipt, QuoteError> {
        let identity = self.state.read().require_identity()?;
        if let Err(e) = draft.validate() {
            self.notices.error(e.to_string());
            return Err(e);
        }

        let payload = add_quote_payload(&self.config.module, &draft, is_custom);
        let confirmed = self
            .mutate(
                MutationKind::AddQuote,
                &payload,
                "Failed to add quote. Please try again.",
            )
            .await?;

        {
            let mut state = self.state.write();
            if state.identity.as_ref() == Some(&identity) {
                state.drafts.clear_kind(is_custom);
            }
        }
        self.notices.success("Quote added successfully!");

        Ok(MutationReceipt {
            hash: confirmed.hash,
            refresh: self.refresh().await,
        })
    }

    async fn toggle_like(&self, owner: &Address, id: &str) -> Result<MutationReceipt, QuoteError> {
        self.state.read().require_identity()?;

        let payload = toggle_like_payload(&self.config.module, owner, id);
        let confirmed = self
            .mutate(
                MutationKind::ToggleLike,
                &payload,
                "Failed to toggle quote like. Please try again.",
            )
            .await?;
        self.notices.success("Quote like toggled successfully!");

        Ok(MutationReceipt {
            hash: confirmed.hash,
            refresh: self.refresh().await,
        })
    }

    async fn fetch_random_quote(&self) -> Result<QuoteDraft, QuoteError> {
        let Some(source) = self.quote_source.as_ref() else {
            return Err(QuoteError::Unknown("no random quote source configured".into()));
        };

        let identity = self.identity();
        let result = {
            let _guard = self.begin();
            source.random_quote().await
        };

        match result {
            Ok(draft) => {
                let mut state = self.state.write();
                if state.identity == identity {
                    state.drafts.random = Some(draft.clone());
                }
                Ok(draft)
            }
            Err(e) => {
                warn!(error = %e, "Random quote fetch failed");
                self.notices
                    .error("Failed to fetch random quote. Please try again later.");
                Err(e.into())
            }
        }
    }

    fn quotes(&self) -> Vec<QuoteRecord> {
        self.state.read().store.records().to_vec()
    }

    fn active_scope(&self) -> ViewScope {
        self.state.read().scope.clone()
    }

    fn drafts(&self) -> Drafts {
        self.state.read().drafts.clone()
    }

    fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
