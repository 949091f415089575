//! # Mutation Coordinator
//!
//! Runs one mutation through submit → await confirmation, classifying any
//! failure. Exactly one attempt per call; retries are the caller's decision.

use crate::algorithms::{classify_mutation_failure, classify_vm_status};
use crate::domain::{ConfirmedTransaction, EntryFunctionPayload, MutationKind, QuoteError};
use crate::ports::LedgerGateway;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Submits transactions and waits for them to commit.
pub struct MutationCoordinator<L: LedgerGateway> {
    gateway: Arc<L>,
}

impl<L: LedgerGateway> MutationCoordinator<L> {
    /// Coordinator over `gateway`.
    pub fn new(gateway: Arc<L>) -> Self {
        Self { gateway }
    }

    /// Submit `payload` and wait for it to commit successfully.
    ///
    /// A transaction that commits but fails execution is reported through the
    /// same classification as a failed submission.
    pub async fn execute(
        &self,
        kind: MutationKind,
        payload: &EntryFunctionPayload,
    ) -> Result<ConfirmedTransaction, QuoteError> {
        debug!(mutation = %kind, function = %payload.function, "Submitting transaction");

        let pending = self
            .gateway
            .submit(payload)
            .await
            .map_err(|e| report(kind, classify_mutation_failure(kind, e)))?;

        debug!(mutation = %kind, hash = %pending.hash, "Awaiting confirmation");

        let confirmed = self
            .gateway
            .await_confirmation(&pending)
            .await
            .map_err(|e| report(kind, classify_mutation_failure(kind, e)))?;

        if !confirmed.success {
            return Err(report(kind, classify_vm_status(kind, &confirmed.vm_status)));
        }

        info!(mutation = %kind, hash = %confirmed.hash, "Transaction confirmed");
        Ok(confirmed)
    }
}

fn report(kind: MutationKind, err: QuoteError) -> QuoteError {
    warn!(mutation = %kind, kind = ?err.mutation_kind(), error = %err, "Mutation failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GatewayError, MutationErrorKind};
    use crate::ports::MockLedger;

    fn payload() -> EntryFunctionPayload {
        EntryFunctionPayload::new("0x1::Quotes::add_quote".into(), vec![])
    }

    #[tokio::test]
    async fn test_execute_success() {
        let ledger = Arc::new(MockLedger::new());
        let coordinator = MutationCoordinator::new(ledger.clone());

        let confirmed = coordinator
            .execute(MutationKind::AddQuote, &payload())
            .await
            .unwrap();
        assert!(confirmed.success);
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_execute_vm_failure_is_rejection() {
        let ledger = Arc::new(MockLedger::new());
        ledger.revert_next("Move abort: E_EMPTY_CONTENT");
        let coordinator = MutationCoordinator::new(ledger);

        let err = coordinator
            .execute(MutationKind::AddQuote, &payload())
            .await
            .unwrap_err();
        assert_eq!(err.mutation_kind(), MutationErrorKind::TransactionRejected);
    }

    #[tokio::test]
    async fn test_execute_confirmation_timeout() {
        let ledger = Arc::new(MockLedger::new());
        ledger.fail_next_confirmation(GatewayError::Timeout("0x01".into()));
        let coordinator = MutationCoordinator::new(ledger);

        let err = coordinator
            .execute(MutationKind::ToggleLike, &payload())
            .await
            .unwrap_err();
        assert_eq!(err.mutation_kind(), MutationErrorKind::TransactionTimedOut);
    }

    #[tokio::test]
    async fn test_execute_already_exists_outside_initialize_is_rejection() {
        let ledger = Arc::new(MockLedger::new());
        ledger.revert_next("Move abort in 0x1::Quotes: EALREADY_LIKED(0x3)");
        let coordinator = MutationCoordinator::new(ledger.clone());

        let err = coordinator
            .execute(MutationKind::ToggleLike, &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::TransactionRejected(_)));

        ledger.revert_next("Move abort in 0x1::Quotes: RESOURCE_ALREADY_EXISTS");
        let err = coordinator
            .execute(MutationKind::Initialize, &payload())
            .await
            .unwrap_err();
        assert_eq!(err, QuoteError::AlreadyInitialized);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MutationKind::ToggleLike.to_string(), "toggle_like");
    }
}
