//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound ports against real collaborators: the ledger REST
//! API, the random quote HTTP service and an in-process wallet identity.

mod identity;
mod quotable;
mod rest_gateway;

pub use identity::WalletIdentity;
pub use quotable::HttpQuoteSource;
pub use rest_gateway::{map_error_body, RestLedgerGateway};
