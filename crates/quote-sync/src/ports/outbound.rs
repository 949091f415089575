//! # Outbound Ports
//!
//! Traits for external collaborators: the ledger, the wallet identity, the
//! transaction signer and the random quote source.

use crate::domain::{
    Address, ConfirmedTransaction, EntryFunctionPayload, GatewayError, PendingTransaction,
    QuoteDraft, TxHash, ViewRequest,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::watch;

/// Ledger gateway - outbound port.
///
/// `view` is side-effect free. `submit` only hands the transaction over; its
/// effect is durable once `await_confirmation` returns.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Call a view function and return its raw JSON result.
    async fn view(&self, request: &ViewRequest) -> Result<Value, GatewayError>;

    /// Sign and submit an entry-function transaction.
    async fn submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, GatewayError>;

    /// Wait until a submitted transaction is committed.
    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<ConfirmedTransaction, GatewayError>;
}

/// Identity provider - outbound port.
///
/// Supplies the connected wallet address and notifies on change.
pub trait IdentityProvider: Send + Sync {
    /// Currently connected address, if any.
    fn current(&self) -> Option<Address>;

    /// Receiver that observes every identity change.
    fn subscribe(&self) -> watch::Receiver<Option<Address>>;
}

/// Transaction signer - outbound port (the wallet).
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Sign `payload` with the connected account and submit it.
    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, GatewayError>;
}

/// Random quote source - outbound port.
#[async_trait]
pub trait RandomQuoteSource: Send + Sync {
    /// Fetch one random quote.
    async fn random_quote(&self) -> Result<QuoteDraft, GatewayError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Default)]
struct MockLedgerState {
    responses: HashMap<Address, Value>,
    view_failures: HashMap<Address, GatewayError>,
    view_delays: HashMap<Address, Duration>,
    submit_failures: VecDeque<GatewayError>,
    confirm_failures: VecDeque<GatewayError>,
    vm_failures: VecDeque<String>,
    confirm_delay: Option<Duration>,
    view_calls: Vec<ViewRequest>,
    submissions: Vec<EntryFunctionPayload>,
}

/// In-memory ledger for tests.
///
/// Addresses without a configured response behave like uninitialized
/// accounts: `view` fails with [`GatewayError::ResourceNotFound`].
#[derive(Default)]
pub struct MockLedger {
    state: Mutex<MockLedgerState>,
}

impl MockLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `quotes` (raw JSON elements) for `address`.
    pub fn set_quotes(&self, address: &Address, quotes: Vec<Value>) {
        self.set_raw_response(address, json!([quotes]));
    }

    /// Serve an arbitrary raw view result for `address`.
    pub fn set_raw_response(&self, address: &Address, response: Value) {
        let mut state = self.state.lock();
        state.view_failures.remove(address);
        state.responses.insert(address.clone(), response);
    }

    /// Fail every view of `address` with `err`.
    pub fn fail_view(&self, address: &Address, err: GatewayError) {
        self.state.lock().view_failures.insert(address.clone(), err);
    }

    /// Hold every view of `address` for `delay` before answering.
    pub fn delay_view(&self, address: &Address, delay: Duration) {
        self.state.lock().view_delays.insert(address.clone(), delay);
    }

    /// Fail the next submission with `err`.
    pub fn fail_next_submit(&self, err: GatewayError) {
        self.state.lock().submit_failures.push_back(err);
    }

    /// Fail the next confirmation wait with `err`.
    pub fn fail_next_confirmation(&self, err: GatewayError) {
        self.state.lock().confirm_failures.push_back(err);
    }

    /// Commit the next transaction as failed with `vm_status`.
    pub fn revert_next(&self, vm_status: &str) {
        self.state.lock().vm_failures.push_back(vm_status.to_string());
    }

    /// Hold every confirmation for `delay`.
    pub fn delay_confirmation(&self, delay: Duration) {
        self.state.lock().confirm_delay = Some(delay);
    }

    /// Every view request received so far.
    pub fn view_calls(&self) -> Vec<ViewRequest> {
        self.state.lock().view_calls.clone()
    }

    /// Number of view requests received.
    pub fn view_count(&self) -> usize {
        self.state.lock().view_calls.len()
    }

    /// Every payload submitted so far.
    pub fn submissions(&self) -> Vec<EntryFunctionPayload> {
        self.state.lock().submissions.clone()
    }
}

#[async_trait]
impl LedgerGateway for MockLedger {
    async fn view(&self, request: &ViewRequest) -> Result<Value, GatewayError> {
        let address = request
            .arguments
            .first()
            .and_then(Value::as_str)
            .and_then(|s| Address::from_hex_literal(s).ok())
            .ok_or_else(|| GatewayError::Rejected("invalid view arguments".into()))?;

        let delay = {
            let mut state = self.state.lock();
            state.view_calls.push(request.clone());
            state.view_delays.get(&address).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        if let Some(err) = state.view_failures.get(&address) {
            return Err(err.clone());
        }
        state
            .responses
            .get(&address)
            .cloned()
            .ok_or_else(|| GatewayError::ResourceNotFound(format!("{address}::Quotes::QuoteStore")))
    }

    async fn submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, GatewayError> {
        let mut state = self.state.lock();
        if let Some(err) = state.submit_failures.pop_front() {
            return Err(err);
        }
        state.submissions.push(payload.clone());
        Ok(PendingTransaction {
            hash: TxHash(format!("0x{:064x}", state.submissions.len())),
        })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<ConfirmedTransaction, GatewayError> {
        let delay = self.state.lock().confirm_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if let Some(err) = state.confirm_failures.pop_front() {
            return Err(err);
        }
        Ok(match state.vm_failures.pop_front() {
            Some(vm_status) => ConfirmedTransaction {
                hash: pending.hash.clone(),
                success: false,
                vm_status,
            },
            None => ConfirmedTransaction {
                hash: pending.hash.clone(),
                success: true,
                vm_status: "Executed successfully".to_string(),
            },
        })
    }
}

/// Scripted random quote source for tests.
#[derive(Default)]
pub struct MockQuoteSource {
    queue: Mutex<VecDeque<Result<QuoteDraft, GatewayError>>>,
}

impl MockQuoteSource {
    /// Source that answers with `drafts` in order.
    pub fn with_quotes(drafts: impl IntoIterator<Item = QuoteDraft>) -> Self {
        Self {
            queue: Mutex::new(drafts.into_iter().map(Ok).collect()),
        }
    }

    /// Queue a failure.
    pub fn push_failure(&self, err: GatewayError) {
        self.queue.lock().push_back(Err(err));
    }
}

#[async_trait]
impl RandomQuoteSource for MockQuoteSource {
    async fn random_quote(&self) -> Result<QuoteDraft, GatewayError> {
        self.queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Network("no quotes queued".into())))
    }
}
