//! Bridge between decoded JSON documents and [`Value`]
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::error::Result;
use crate::value::Value;
use serde_json::Value as JsonValue;

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Bool(flag),
            JsonValue::Number(number) => {
                if let Some(n) = number.as_i64() {
                    Value::I64(n)
                } else if let Some(n) = number.as_u64() {
                    Value::U64(n)
                } else {
                    Value::F64(number.as_f64().unwrap_or_default())
                }
            }
            JsonValue::String(text) => Value::String(text),
            JsonValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(flag) => JsonValue::from(*flag),
            Value::I8(n) => JsonValue::from(*n),
            Value::I16(n) => JsonValue::from(*n),
            Value::I32(n) => JsonValue::from(*n),
            Value::I64(n) => JsonValue::from(*n),
            Value::U8(n) => JsonValue::from(*n),
            Value::U16(n) => JsonValue::from(*n),
            Value::U32(n) => JsonValue::from(*n),
            Value::U64(n) => JsonValue::from(*n),
            Value::F32(n) => JsonValue::from(*n),
            Value::F64(n) => JsonValue::from(*n),
            Value::String(text) => JsonValue::String(text.clone()),
            Value::Timestamp(at) => JsonValue::String(at.to_rfc3339()),
            Value::Nullable(held) if held.is_valid() => JsonValue::from(&held.held()),
            Value::Nullable(_) => JsonValue::Null,
            Value::Sequence(items) => JsonValue::Array(items.iter().map(JsonValue::from).collect()),
            Value::Mapping(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), JsonValue::from(value)))
                    .collect(),
            ),
            Value::Record(record) => JsonValue::Object(
                record
                    .iter()
                    .map(|(name, value)| (name.to_string(), JsonValue::from(value)))
                    .collect(),
            ),
            Value::Custom(custom) => JsonValue::from(custom.inner()),
            Value::Dynamic(inner) => JsonValue::from(inner.as_ref()),
        }
    }
}

impl Value {
    /// Decode a JSON document into a value tree
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: JsonValue = serde_json::from_str(text)?;
        Ok(Value::from(json))
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::from(self)
    }
}
