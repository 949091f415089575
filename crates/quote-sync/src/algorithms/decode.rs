//! # View Result Decoding
//!
//! Turns the loosely typed `get_all_quotes` view result into [`QuoteRecord`]s.
//!
//! The ledger returns `[[quote, ...]]`. Each quote is either an object with
//! named fields or a positional tuple in the order
//! `id, content, author, created_at, likes, owner, is_custom, liked_by`.
//! Numbers may arrive as JSON numbers or as decimal strings.
//!
//! | Field | Required | Default |
//! |-------|----------|---------|
//! | `id` | yes | |
//! | `content` | yes | |
//! | `owner` | yes | |
//! | `author` | no | `""` |
//! | `created_at` | no | unix epoch |
//! | `likes` | no | `0` |
//! | `is_custom` | no | `false` |
//! | `liked_by` | no | empty set |

use crate::domain::{Address, DecodeError, QuoteRecord};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

const TUPLE_FIELDS: [&str; 8] = [
    "id",
    "content",
    "author",
    "created_at",
    "likes",
    "owner",
    "is_custom",
    "liked_by",
];

/// Decode a full view result into one result per raw element.
///
/// Fails as a whole only when the outer shape is wrong. An empty outer array
/// decodes to no records.
pub fn decode_view_result(
    result: &Value,
) -> Result<Vec<Result<QuoteRecord, DecodeError>>, DecodeError> {
    let outer = result
        .as_array()
        .ok_or_else(|| DecodeError::Shape(format!("expected array, got {}", kind(result))))?;

    let Some(first) = outer.first() else {
        return Ok(Vec::new());
    };

    let quotes = first.as_array().ok_or_else(|| {
        DecodeError::Shape(format!("expected array of quotes, got {}", kind(first)))
    })?;

    Ok(quotes.iter().map(decode_quote).collect())
}

/// Decode a single raw quote (object or positional tuple).
pub fn decode_quote(raw: &Value) -> Result<QuoteRecord, DecodeError> {
    match raw {
        Value::Object(fields) => decode_fields(fields),
        Value::Array(items) => {
            let fields: Map<String, Value> = TUPLE_FIELDS
                .iter()
                .zip(items.iter())
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            decode_fields(&fields)
        }
        other => Err(DecodeError::Shape(format!(
            "expected quote object or tuple, got {}",
            kind(other)
        ))),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Result<QuoteRecord, DecodeError> {
    let id = required(fields, "id").and_then(coerce_id)?;
    let content = required(fields, "content").and_then(|v| coerce_string("content", v))?;
    let owner = required(fields, "owner").and_then(|v| coerce_address("owner", v))?;

    let author = optional(fields, "author")
        .map(|v| coerce_string("author", v))
        .transpose()?
        .unwrap_or_default();
    let created_at = optional(fields, "created_at")
        .map(|v| coerce_u64("created_at", v).and_then(|secs| to_timestamp(secs, v)))
        .transpose()?
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let like_count = optional(fields, "likes")
        .map(|v| coerce_u64("likes", v))
        .transpose()?
        .unwrap_or(0);
    let is_custom = optional(fields, "is_custom")
        .map(|v| coerce_bool("is_custom", v))
        .transpose()?
        .unwrap_or(false);
    let liked_by = optional(fields, "liked_by")
        .map(coerce_address_set)
        .transpose()?
        .unwrap_or_default();

    Ok(QuoteRecord {
        id,
        content,
        author,
        created_at,
        like_count,
        liked_by,
        owner,
        is_custom,
    })
}

/// Sort newest first. Equal timestamps keep their ledger order.
pub fn sort_newest_first(records: &mut [QuoteRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn required<'a>(fields: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, DecodeError> {
    optional(fields, name).ok_or(DecodeError::MissingField(name))
}

/// Absent and `null` are the same thing here.
fn optional<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn invalid(field: &'static str, value: &Value) -> DecodeError {
    DecodeError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn coerce_id(value: &Value) -> Result<String, DecodeError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid("id", other)),
    }
}

fn coerce_string(field: &'static str, value: &Value) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(field, value))
}

fn coerce_u64(field: &'static str, value: &Value) -> Result<u64, DecodeError> {
    match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| invalid(field, value)),
        Value::String(s) => s.trim().parse().map_err(|_| invalid(field, value)),
        other => Err(invalid(field, other)),
    }
}

fn coerce_bool(field: &'static str, value: &Value) -> Result<bool, DecodeError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(invalid(field, value)),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid(field, value)),
        },
        other => Err(invalid(field, other)),
    }
}

fn coerce_address(field: &'static str, value: &Value) -> Result<Address, DecodeError> {
    value
        .as_str()
        .and_then(|s| Address::from_hex_literal(s).ok())
        .ok_or_else(|| invalid(field, value))
}

fn coerce_address_set(value: &Value) -> Result<BTreeSet<Address>, DecodeError> {
    let items = value.as_array().ok_or_else(|| invalid("liked_by", value))?;
    items
        .iter()
        .map(|item| coerce_address("liked_by", item))
        .collect()
}

fn to_timestamp(secs: u64, raw: &Value) -> Result<DateTime<Utc>, DecodeError> {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| invalid("created_at", raw))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_string_encoded_quote() {
        let raw = json!([[{
            "id": "1",
            "content": "A",
            "author": "X",
            "created_at": "1000",
            "likes": "2",
            "owner": "0xabc",
            "is_custom": "true"
        }]]);

        let decoded = decode_view_result(&raw).unwrap();
        assert_eq!(decoded.len(), 1);
        let quote = decoded[0].as_ref().unwrap();
        assert_eq!(quote.id, "1");
        assert_eq!(quote.like_count, 2);
        assert!(quote.is_custom);
        assert!(quote.liked_by.is_empty());
        assert_eq!(quote.created_at.timestamp(), 1000);
        assert_eq!(quote.owner, Address::from_hex_literal("0xabc").unwrap());
    }

    #[test]
    fn test_decode_native_json_types() {
        let raw = json!({
            "id": 42,
            "content": "B",
            "author": "Y",
            "created_at": 2000,
            "likes": 0,
            "owner": "0x1",
            "is_custom": false,
            "liked_by": ["0x2", "0x3"]
        });

        let quote = decode_quote(&raw).unwrap();
        assert_eq!(quote.id, "42");
        assert!(!quote.is_custom);
        assert_eq!(quote.liked_by.len(), 2);
        assert!(quote.is_liked_by(&Address::from_hex_literal("0x3").unwrap()));
    }

    #[test]
    fn test_decode_tuple_shape() {
        let raw = json!(["5", "C", "Z", "3000", "1", "0x9", true]);
        let quote = decode_quote(&raw).unwrap();
        assert_eq!(quote.id, "5");
        assert_eq!(quote.author, "Z");
        assert_eq!(quote.like_count, 1);
        assert!(quote.is_custom);
        assert!(quote.liked_by.is_empty());
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let raw = json!({ "id": "1", "content": "only content", "owner": "0x1", "liked_by": null });
        let quote = decode_quote(&raw).unwrap();
        assert_eq!(quote.author, "");
        assert_eq!(quote.like_count, 0);
        assert!(!quote.is_custom);
        assert_eq!(quote.created_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_missing_required_field() {
        let raw = json!({ "content": "no id", "owner": "0x1" });
        assert_eq!(decode_quote(&raw), Err(DecodeError::MissingField("id")));
    }

    #[test]
    fn test_invalid_field_values() {
        let raw = json!({ "id": "1", "content": "c", "owner": "0x1", "likes": "-3" });
        assert!(matches!(
            decode_quote(&raw),
            Err(DecodeError::InvalidField { field: "likes", .. })
        ));

        let raw = json!({ "id": "1", "content": "c", "owner": "bob" });
        assert!(matches!(
            decode_quote(&raw),
            Err(DecodeError::InvalidField { field: "owner", .. })
        ));

        let raw = json!({ "id": "1", "content": "c", "owner": "0x1", "is_custom": "maybe" });
        assert!(decode_quote(&raw).is_err());
    }

    #[test]
    fn test_bad_element_does_not_poison_batch() {
        let raw = json!([[
            { "id": "1", "content": "ok", "owner": "0x1" },
            "garbage",
            { "id": "2", "content": "ok too", "owner": "0x1" }
        ]]);
        let decoded = decode_view_result(&raw).unwrap();
        assert_eq!(decoded.len(), 3);
        assert!(decoded[0].is_ok());
        assert!(decoded[1].is_err());
        assert!(decoded[2].is_ok());
    }

    #[test]
    fn test_outer_shape() {
        assert!(decode_view_result(&json!([])).unwrap().is_empty());
        assert!(decode_view_result(&json!([[]])).unwrap().is_empty());
        assert!(matches!(
            decode_view_result(&json!({ "quotes": [] })),
            Err(DecodeError::Shape(_))
        ));
        assert!(matches!(
            decode_view_result(&json!(["not a list"])),
            Err(DecodeError::Shape(_))
        ));
    }

    #[test]
    fn test_sort_newest_first() {
        let raw = json!([[
            { "id": "old", "content": "a", "owner": "0x1", "created_at": "1000" },
            { "id": "new", "content": "b", "owner": "0x1", "created_at": "2000" }
        ]]);
        let mut records: Vec<QuoteRecord> = decode_view_result(&raw)
            .unwrap()
            .into_iter()
            .map(Result::unwrap)
            .collect();
        sort_newest_first(&mut records);
        assert_eq!(records[0].id, "new");
        assert_eq!(records[1].id, "old");
    }
}
