//! # Call Descriptions
//!
//! Builds view requests and entry-function payloads for the quote module.

use crate::config::ModuleConfig;
use crate::domain::{Address, EntryFunctionPayload, QuoteDraft, ViewRequest};
use serde_json::Value;

/// `get_all_quotes(address)`
pub fn get_all_quotes_request(module: &ModuleConfig, address: &Address) -> ViewRequest {
    ViewRequest {
        function: module.qualified(&module.get_all_quotes_fn),
        type_arguments: Vec::new(),
        arguments: vec![Value::String(address.to_string())],
    }
}

/// `initialize()`
pub fn initialize_payload(module: &ModuleConfig) -> EntryFunctionPayload {
    EntryFunctionPayload::new(module.qualified(&module.initialize_fn), Vec::new())
}

/// `add_quote(content, author, is_custom)`
pub fn add_quote_payload(
    module: &ModuleConfig,
    draft: &QuoteDraft,
    is_custom: bool,
) -> EntryFunctionPayload {
    EntryFunctionPayload::new(
        module.qualified(&module.add_quote_fn),
        vec![
            Value::String(draft.content.clone()),
            Value::String(draft.author.clone()),
            Value::Bool(is_custom),
        ],
    )
}

/// `toggle_like_quote(owner, id)`
pub fn toggle_like_payload(module: &ModuleConfig, owner: &Address, id: &str) -> EntryFunctionPayload {
    EntryFunctionPayload::new(
        module.qualified(&module.toggle_like_fn),
        vec![Value::String(owner.to_string()), Value::String(id.to_string())],
    )
}
