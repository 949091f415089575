//! # Domain Errors
//!
//! Error types for quote synchronization, split by layer:
//!
//! - [`GatewayError`] is what the ledger and quote-source ports report.
//! - [`DecodeError`] is a single raw quote that could not be understood.
//! - [`QuoteError`] is what the board API surfaces to its caller.

use thiserror::Error;

/// Abort markers the ledger uses when a create-if-absent resource already exists.
const ALREADY_EXISTS_MARKERS: &[&str] = &[
    "RESOURCE_ALREADY_EXISTS",
    "ALREADY_EXISTS",
    "ALREADY_INITIALIZED",
    "EALREADY",
];

/// Failure reported by an outbound port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The queried resource does not exist on the ledger yet.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Move execution aborted.
    #[error("Execution aborted: {0}")]
    Aborted(String),

    /// Transaction refused at submission or failed on-chain.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// The gateway stopped waiting for a response or confirmation.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// No signer is attached, so nothing can be submitted.
    #[error("No transaction signer available")]
    SignerUnavailable,

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote answered with something we could not parse.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// A read that failed because the address was never initialized.
    pub fn is_remote_absence(&self) -> bool {
        matches!(self, Self::ResourceNotFound(_) | Self::Aborted(_))
    }

    /// A submission that failed because the resource already exists.
    pub fn is_already_exists(&self) -> bool {
        let message = match self {
            Self::Aborted(m) | Self::Rejected(m) => m,
            _ => return false,
        };
        let upper = message.to_ascii_uppercase();
        ALREADY_EXISTS_MARKERS.iter().any(|m| upper.contains(m))
    }
}

/// A raw quote element that could not be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The view result is not shaped like `[[quote, ...]]`.
    #[error("Unexpected view result shape: {0}")]
    Shape(String),

    /// A required field is absent.
    #[error("Missing field `{0}`")]
    MissingField(&'static str),

    /// A field is present but cannot be coerced.
    #[error("Invalid value for `{field}`: {value}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Offending raw value
        value: String,
    },
}

/// Coarse error taxonomy used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally before any remote call.
    Validation,
    /// The remote resource does not exist yet.
    RemoteAbsence,
    /// Submission or confirmation failed.
    TransactionFailure,
    /// Remote response had an unexpected shape.
    Decode,
    /// Anything else.
    Unknown,
}

/// Classification of a failed mutation, as surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationErrorKind {
    /// No authenticated identity.
    NotAuthenticated,
    /// Initialization hit an existing resource (treated as success).
    AlreadyInitialized,
    /// The ledger refused or reverted the transaction.
    TransactionRejected,
    /// Confirmation did not arrive in time.
    TransactionTimedOut,
    /// Anything else.
    Unknown,
}

/// Errors surfaced by the quote board.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// Address is not `0x` followed by 64 hex digits.
    #[error("Invalid address format: {0:?}")]
    InvalidAddressFormat(String),

    /// A required input field is blank.
    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    /// The operation needs a connected identity.
    #[error("No authenticated identity")]
    NotAuthenticated,

    /// The quote resource already exists for this identity.
    #[error("Quote resource already initialized")]
    AlreadyInitialized,

    /// The ledger refused or reverted the transaction.
    #[error("Transaction rejected: {0}")]
    TransactionRejected(String),

    /// Confirmation did not arrive in time. The transaction may still land.
    #[error("Transaction timed out: {0}")]
    TransactionTimedOut(String),

    /// The queried resource does not exist yet.
    #[error("Remote resource absent: {0}")]
    RemoteAbsence(String),

    /// Remote response had an unexpected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Catch-all.
    #[error("Unexpected failure: {0}")]
    Unknown(String),
}

impl QuoteError {
    /// Taxonomy bucket of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidAddressFormat(_) | Self::EmptyField(_) | Self::NotAuthenticated => {
                ErrorCategory::Validation
            }
            Self::RemoteAbsence(_) => ErrorCategory::RemoteAbsence,
            Self::AlreadyInitialized
            | Self::TransactionRejected(_)
            | Self::TransactionTimedOut(_) => ErrorCategory::TransactionFailure,
            Self::Decode(_) => ErrorCategory::Decode,
            Self::Unknown(_) => ErrorCategory::Unknown,
        }
    }

    /// Mutation classification of this error.
    pub fn mutation_kind(&self) -> MutationErrorKind {
        match self {
            Self::NotAuthenticated => MutationErrorKind::NotAuthenticated,
            Self::AlreadyInitialized => MutationErrorKind::AlreadyInitialized,
            Self::TransactionRejected(_) => MutationErrorKind::TransactionRejected,
            Self::TransactionTimedOut(_) => MutationErrorKind::TransactionTimedOut,
            _ => MutationErrorKind::Unknown,
        }
    }
}

impl From<GatewayError> for QuoteError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ResourceNotFound(m) | GatewayError::Aborted(m) => Self::RemoteAbsence(m),
            GatewayError::Rejected(m) => Self::TransactionRejected(m),
            GatewayError::Timeout(m) => Self::TransactionTimedOut(m),
            GatewayError::SignerUnavailable => Self::NotAuthenticated,
            GatewayError::Malformed(m) => Self::Decode(m),
            GatewayError::Network(m) => Self::Unknown(m),
        }
    }
}

impl From<DecodeError> for QuoteError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}
