//! # Failure Classification
//!
//! Maps gateway failures of a mutation onto the caller-facing error kinds.

use crate::domain::{GatewayError, MutationKind, QuoteError};

/// Classify a failed submission or confirmation of a `kind` mutation.
///
/// "Already exists" aborts become [`QuoteError::AlreadyInitialized`] only for
/// [`MutationKind::Initialize`], which treats them as success. Every other
/// abort, including already-exists aborts of other mutations, and every
/// missing resource is a rejection.
pub fn classify_mutation_failure(kind: MutationKind, err: GatewayError) -> QuoteError {
    if kind == MutationKind::Initialize && err.is_already_exists() {
        return QuoteError::AlreadyInitialized;
    }
    match err {
        GatewayError::Aborted(m) | GatewayError::ResourceNotFound(m) => {
            QuoteError::TransactionRejected(m)
        }
        other => other.into(),
    }
}

/// Classify a failed on-chain execution reported at confirmation.
pub fn classify_vm_status(kind: MutationKind, vm_status: &str) -> QuoteError {
    classify_mutation_failure(kind, GatewayError::Rejected(vm_status.to_string()))
}
