//! # Algorithms Module
//!
//! Pure steps of the sync pipeline: decoding, failure classification, call
//! construction.

pub mod classify;
pub mod decode;
pub mod payload;

pub use classify::{classify_mutation_failure, classify_vm_status};
pub use decode::{decode_quote, decode_view_result, sort_newest_first};
pub use payload::{
    add_quote_payload, get_all_quotes_request, initialize_payload, toggle_like_payload,
};
