//! Binding text documents to record types
//!
//! `serde_json` parses the text into a `serde_json::Value`; this module
//! binds that document to a record schema field by field. Each field value
//! is converted according to its declared [`FieldType`] and written through
//! the same set-once path as a programmatic write. Nested record documents
//! are bound recursively after their own type passes validation.

use crate::config::TokenUnwrap;
use crate::error::{DecodeError, Error, Result};
use crate::field_type::FieldType;
use crate::gateway::Gateway;
use crate::record::RecordData;
use crate::schema::Schema;
use crate::token::Token;
use crate::value::Value;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Strip a `{"<token>": {...}}` wrapper when the policy allows it
///
/// Only a single-key object whose key parses as a token is unwrapped;
/// anything else is returned untouched.
pub(crate) fn unwrap_token(document: JsonValue, policy: TokenUnwrap) -> JsonValue {
    if policy == TokenUnwrap::Reject {
        return document;
    }
    match document {
        JsonValue::Object(entries)
            if entries.len() == 1 && entries.keys().all(|k| Token::parse(k).is_some()) =>
        {
            match entries.into_iter().next() {
                Some((token, inner)) => {
                    debug!(target: "immutable::gateway", %token, "unwrapping token-wrapped document");
                    inner
                }
                None => JsonValue::Null,
            }
        }
        other => other,
    }
}

/// Bind an object document to a fresh, locked record of `schema`
pub(crate) fn bind_record(
    gateway: &Gateway,
    schema: &'static Schema,
    type_id: TypeId,
    document: JsonValue,
    path: &str,
) -> Result<RecordData> {
    let entries = match document {
        JsonValue::Object(entries) => entries,
        other => {
            return Err(DecodeError::NotAnObject {
                type_name: schema.name(),
                found: json_kind(&other),
            }
            .into())
        }
    };

    let mut data = RecordData::new(schema, type_id);
    for (key, raw) in entries {
        let field_path = child_path(path, &key);
        let Some(def) = schema.field(&key) else {
            if gateway.config().deny_unknown_fields {
                return Err(DecodeError::UnknownField {
                    type_name: schema.name(),
                    path: field_path,
                }
                .into());
            }
            continue;
        };
        let value = bind_value(gateway, def.ty(), raw, &field_path)?;
        data.try_set(def.name(), value)?;
    }
    data.lock();
    Ok(data)
}

/// Convert one document value according to its declared field type
fn bind_value(gateway: &Gateway, ty: &FieldType, raw: JsonValue, path: &str) -> Result<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    if let Some(element) = ty.element() {
        return match raw {
            JsonValue::Object(entries) if ty.is_map() => {
                let mut bound = BTreeMap::new();
                for (key, item) in entries {
                    let item_path = child_path(path, &key);
                    bound.insert(key, bind_value(gateway, element, item, &item_path)?);
                }
                Ok(Value::Map(bound))
            }
            JsonValue::Array(items) if !ty.is_map() => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| bind_value(gateway, element, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Err(shape(path, ty, json_kind(&other))),
        };
    }

    if ty.is_integer() {
        return match raw {
            JsonValue::Number(n) => {
                let value = n
                    .as_i64()
                    .map(Value::Int)
                    .or_else(|| n.as_u64().map(Value::UInt));
                match value {
                    Some(value) if ty.admits(&value) => Ok(ty.normalize(value)),
                    _ => Err(shape(path, ty, format!("number {n}"))),
                }
            }
            other => Err(shape(path, ty, json_kind(&other))),
        };
    }

    match (ty, raw) {
        (FieldType::Bool, JsonValue::Bool(b)) => Ok(Value::Bool(b)),
        (FieldType::String, JsonValue::String(s)) => Ok(Value::String(s)),
        (FieldType::Char, JsonValue::String(s)) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(shape(path, ty, format!("string {s:?}"))),
            }
        }
        (FieldType::F32 | FieldType::F64, JsonValue::Number(n)) => n
            .as_f64()
            .map(Value::Float)
            .filter(|value| ty.admits(value))
            .ok_or_else(|| shape(path, ty, format!("number {n}"))),
        (FieldType::Decimal, JsonValue::Number(n)) => Decimal::from_str(&n.to_string())
            .map(Value::Decimal)
            .map_err(|_| shape(path, ty, format!("number {n}"))),
        (FieldType::Decimal, JsonValue::String(s)) => Decimal::from_str(&s)
            .map(Value::Decimal)
            .map_err(|_| shape(path, ty, format!("string {s:?}"))),
        (FieldType::DateTime, JsonValue::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
            .map_err(|_| shape(path, ty, format!("string {s:?}"))),
        (FieldType::Record(nested), raw @ JsonValue::Object(_)) => {
            gateway.validate_ref(nested)?;
            let data = bind_record(gateway, nested.schema(), nested.type_id(), raw, path)?;
            Ok(Value::Record(Arc::new(data)))
        }
        (FieldType::Named(_), raw) => Ok(Value::from(raw)),
        (ty, other) => Err(shape(path, ty, json_kind(&other))),
    }
}

fn shape(path: &str, expected: &FieldType, found: impl Into<String>) -> Error {
    DecodeError::Shape {
        path: path.to_string(),
        expected: expected.to_string(),
        found: found.into(),
    }
    .into()
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
