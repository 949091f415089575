//! # Quote Sync
//!
//! Client-side state synchronization for an on-chain quote board.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Keep a local view of the quotes stored under one ledger address consistent
//! with the ledger while the user browses, searches and mutates:
//! - Fetch, decode and order the remote collection
//! - Hide quotes locally without touching the ledger
//! - Submit mutations and refetch only after confirmation
//! - Drop results that resume after the user moved on
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | No stale overwrite | Scope epoch captured at issue, checked at resume |
//! | Hidden stays hidden | Overlay applied to every fetch |
//! | One initialization per identity | Per-identity state set before submitting |
//! | No optimistic writes | Store only changes from a fetch |
//!
//! ## Module Structure
//!
//! ```text
//! quote-sync/
//! ├── domain/          # Records, store, overlay, scope, errors
//! ├── algorithms/      # Decoding, failure classification, call construction
//! ├── ports/           # API trait (inbound) + ledger/identity/source traits (outbound)
//! ├── application/     # QuoteBoardService, MutationCoordinator, NoticeBus
//! ├── adapters/        # REST ledger gateway, random quote source, wallet identity
//! ├── config.rs        # QuoteSyncConfig
//! └── telemetry.rs     # Logging setup
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

// Re-exports
pub use adapters::{HttpQuoteSource, RestLedgerGateway, WalletIdentity};
pub use algorithms::{
    classify_mutation_failure, decode_quote, decode_view_result, sort_newest_first,
};
pub use application::{Notice, NoticeLevel, QuoteBoardService};
pub use config::{ConfigError, ModuleConfig, QuoteSyncConfig};
pub use domain::{
    Address, Drafts, ErrorCategory, FetchOutcome, GatewayError, InitializationState,
    LocalOverlay, MutationErrorKind, MutationKind, MutationReceipt, QuoteDraft, QuoteError,
    QuoteKey, QuoteRecord, QuoteStore, TxHash, ViewScope,
};
pub use ports::{
    IdentityProvider, LedgerGateway, MockLedger, MockQuoteSource, QuoteBoardApi,
    RandomQuoteSource, TransactionSigner,
};
pub use telemetry::init_logging;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
