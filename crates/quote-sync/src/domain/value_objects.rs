//! # Domain Value Objects
//!
//! Immutable value types: addresses, scopes, drafts, ledger payloads.

use super::entities::QuoteRecord;
use super::errors::QuoteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Required address prefix.
pub const ADDRESS_PREFIX: &str = "0x";

/// Number of hex digits in a full-width account address.
pub const ADDRESS_HEX_LEN: usize = 64;

/// Ledger account address, normalized to lowercase full-width hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse user input. Requires the `0x` prefix and exactly 64 hex digits.
    pub fn parse(input: &str) -> Result<Self, QuoteError> {
        let hex = strip_prefix(input.trim())
            .ok_or_else(|| QuoteError::InvalidAddressFormat(input.to_string()))?;
        if hex.len() != ADDRESS_HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(QuoteError::InvalidAddressFormat(input.to_string()));
        }
        Ok(Self(format!("{ADDRESS_PREFIX}{}", hex.to_ascii_lowercase())))
    }

    /// Parse a ledger-emitted literal, which may use the short form (`0x1`).
    /// Short forms are zero-padded to full width.
    pub fn from_hex_literal(input: &str) -> Result<Self, QuoteError> {
        let hex = strip_prefix(input.trim())
            .ok_or_else(|| QuoteError::InvalidAddressFormat(input.to_string()))?;
        if hex.is_empty()
            || hex.len() > ADDRESS_HEX_LEN
            || !hex.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(QuoteError::InvalidAddressFormat(input.to_string()));
        }
        Ok(Self(format!(
            "{ADDRESS_PREFIX}{:0>width$}",
            hex.to_ascii_lowercase(),
            width = ADDRESS_HEX_LEN
        )))
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_prefix(input: &str) -> Option<&str> {
    input
        .strip_prefix(ADDRESS_PREFIX)
        .or_else(|| input.strip_prefix("0X"))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex_literal(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Whose quotes are on display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewScope {
    /// The authenticated identity's own quotes.
    #[default]
    Own,
    /// An explicitly searched address.
    Address(Address),
}

impl ViewScope {
    /// Parse search input. Blank input selects [`ViewScope::Own`].
    pub fn parse(input: &str) -> Result<Self, QuoteError> {
        if input.trim().is_empty() {
            return Ok(Self::Own);
        }
        Address::parse(input).map(Self::Address)
    }

    /// Resolve to a concrete address given the current identity.
    pub fn resolve(&self, identity: Option<&Address>) -> Result<Address, QuoteError> {
        match self {
            Self::Own => identity.cloned().ok_or(QuoteError::NotAuthenticated),
            Self::Address(address) => Ok(address.clone()),
        }
    }

    /// Is this an explicit search rather than the default own view?
    pub fn is_search(&self) -> bool {
        matches!(self, Self::Address(_))
    }
}

impl fmt::Display for ViewScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Own => f.write_str("self"),
            Self::Address(address) => write!(f, "{address}"),
        }
    }
}

/// A quote being prepared for submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    /// Quote text.
    pub content: String,
    /// Attributed author.
    pub author: String,
}

impl QuoteDraft {
    /// Create a draft.
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
        }
    }

    /// Both fields must be non-blank.
    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.content.trim().is_empty() {
            return Err(QuoteError::EmptyField("content"));
        }
        if self.author.trim().is_empty() {
            return Err(QuoteError::EmptyField("author"));
        }
        Ok(())
    }

    /// True when nothing has been typed yet.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.author.is_empty()
    }
}

/// In-progress drafts. Session memory only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Drafts {
    /// Quote pulled from the random quote source.
    pub random: Option<QuoteDraft>,
    /// Quote composed by hand.
    pub custom: QuoteDraft,
}

impl Drafts {
    /// Drop the draft of the given kind.
    pub fn clear_kind(&mut self, is_custom: bool) {
        if is_custom {
            self.custom = QuoteDraft::default();
        } else {
            self.random = None;
        }
    }

    /// Drop both drafts.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Progress of the per-identity resource initialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitializationState {
    /// Nothing submitted yet this session.
    #[default]
    NotAttempted,
    /// Submitted once; not confirmed. Never retried automatically.
    Attempted,
    /// Resource known to exist.
    Confirmed,
}

/// Result of a fetch that reached the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Records now held by the store.
    Applied(Vec<QuoteRecord>),
    /// Scope or identity moved on while in flight; result dropped.
    Discarded,
}

impl FetchOutcome {
    /// Applied records, if any.
    pub fn records(&self) -> Option<&[QuoteRecord]> {
        match self {
            Self::Applied(records) => Some(records),
            Self::Discarded => None,
        }
    }

    /// Was the result dropped as stale?
    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}

/// Transaction hash returned by submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only view-function call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    /// Fully qualified function name.
    pub function: String,
    /// Generic type arguments (always empty here).
    pub type_arguments: Vec<String>,
    /// Call arguments.
    pub arguments: Vec<serde_json::Value>,
}

/// Entry-function transaction payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    /// Always `entry_function_payload`.
    #[serde(rename = "type")]
    pub payload_type: String,
    /// Fully qualified function name.
    pub function: String,
    /// Generic type arguments (always empty here).
    pub type_arguments: Vec<String>,
    /// Call arguments.
    pub arguments: Vec<serde_json::Value>,
}

/// Payload type tag for entry functions.
pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

impl EntryFunctionPayload {
    /// Build an entry-function payload without type arguments.
    pub fn new(function: String, arguments: Vec<serde_json::Value>) -> Self {
        Self {
            payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

/// Handle for a submitted, not yet confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Transaction hash.
    pub hash: TxHash,
}

/// Final state of a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTransaction {
    /// Transaction hash.
    pub hash: TxHash,
    /// Did execution succeed?
    pub success: bool,
    /// VM status string (abort reason on failure).
    pub vm_status: String,
}

/// Kind of ledger mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    /// Create the identity's quote resource.
    Initialize,
    /// Add a quote.
    AddQuote,
    /// Toggle a like.
    ToggleLike,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initialize => "initialize",
            Self::AddQuote => "add_quote",
            Self::ToggleLike => "toggle_like",
        })
    }
}

/// What a successful mutation hands back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationReceipt {
    /// Confirmed transaction hash.
    pub hash: TxHash,
    /// Outcome of the refetch that followed confirmation.
    pub refresh: Result<FetchOutcome, QuoteError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x34d6b6437bfca564420f3d609e66dc3e4dc625fc1a390efdd55abc1940177819";

    #[test]
    fn test_address_parse_valid() {
        let address = Address::parse(ALICE).unwrap();
        assert_eq!(address.as_str(), ALICE);
    }

    #[test]
    fn test_address_parse_normalizes_case_and_whitespace() {
        let upper = format!("  0X{}  ", ALICE[2..].to_ascii_uppercase());
        assert_eq!(Address::parse(&upper).unwrap().as_str(), ALICE);
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        for input in ["not-an-address", "0x1234", &ALICE[2..], "0xzz", ""] {
            assert!(matches!(
                Address::parse(input),
                Err(QuoteError::InvalidAddressFormat(_))
            ));
        }
        let too_long = format!("{ALICE}0");
        assert!(Address::parse(&too_long).is_err());
    }

    #[test]
    fn test_address_from_short_literal() {
        let address = Address::from_hex_literal("0xabc").unwrap();
        assert_eq!(address.as_str().len(), 2 + ADDRESS_HEX_LEN);
        assert!(address.as_str().ends_with("0abc"));
        assert!(Address::from_hex_literal("0x").is_err());
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(ViewScope::parse("   ").unwrap(), ViewScope::Own);
        assert!(ViewScope::parse(ALICE).unwrap().is_search());
        assert!(ViewScope::parse("nope").is_err());
    }

    #[test]
    fn test_scope_resolve() {
        let me = Address::parse(ALICE).unwrap();
        assert_eq!(ViewScope::Own.resolve(Some(&me)).unwrap(), me);
        assert_eq!(
            ViewScope::Own.resolve(None),
            Err(QuoteError::NotAuthenticated)
        );
        let other = Address::from_hex_literal("0x1").unwrap();
        assert_eq!(
            ViewScope::Address(other.clone()).resolve(None).unwrap(),
            other
        );
    }

    #[test]
    fn test_draft_validation() {
        assert!(QuoteDraft::new("Stay hungry", "Jobs").validate().is_ok());
        assert_eq!(
            QuoteDraft::new("  ", "Jobs").validate(),
            Err(QuoteError::EmptyField("content"))
        );
        assert_eq!(
            QuoteDraft::new("Stay hungry", "").validate(),
            Err(QuoteError::EmptyField("author"))
        );
    }

    #[test]
    fn test_drafts_clear_kind() {
        let mut drafts = Drafts {
            random: Some(QuoteDraft::new("a", "b")),
            custom: QuoteDraft::new("c", "d"),
        };
        drafts.clear_kind(false);
        assert!(drafts.random.is_none());
        assert!(!drafts.custom.is_empty());
        drafts.clear_kind(true);
        assert!(drafts.custom.is_empty());
    }

    #[test]
    fn test_entry_payload_serializes_type_tag() {
        let payload = EntryFunctionPayload::new("0x1::Quotes::initialize".into(), vec![]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "entry_function_payload");
        assert_eq!(json["type_arguments"], serde_json::json!([]));
    }
}
