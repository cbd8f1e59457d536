//! Dynamic value tree
//!
//! [`Value`] is the closed kind enumeration every conversion operates on:
//! keyed mappings, fixed-field records, sequences, scalars, nullable
//! wrappers, named custom types and dynamically-typed containers.
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::nullable::NullableValue;
use crate::schema::RecordSchema;
use crate::types::ScalarKind;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Runtime value moved through the conversion engine
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// One of the four built-in nullable wrappers
    Nullable(NullableValue),
    Sequence(Vec<Value>),
    /// Keyed mapping, order irrelevant
    Mapping(BTreeMap<String, Value>),
    /// Fixed-field record
    Record(RecordValue),
    /// Named type over an underlying representation
    Custom(CustomValue),
    /// Value whose static type is "any"
    Dynamic(Box<Value>),
}

impl Value {
    /// Wrap a value as dynamically typed
    pub fn dynamic(value: impl Into<Value>) -> Self {
        Value::Dynamic(Box::new(value.into()))
    }

    /// Build a mapping from key/value pairs
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalar kind of this value, `None` for non-scalars
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            Value::Bool(_) => ScalarKind::Bool,
            Value::I8(_) => ScalarKind::I8,
            Value::I16(_) => ScalarKind::I16,
            Value::I32(_) => ScalarKind::I32,
            Value::I64(_) => ScalarKind::I64,
            Value::U8(_) => ScalarKind::U8,
            Value::U16(_) => ScalarKind::U16,
            Value::U32(_) => ScalarKind::U32,
            Value::U64(_) => ScalarKind::U64,
            Value::F32(_) => ScalarKind::F32,
            Value::F64(_) => ScalarKind::F64,
            Value::String(_) => ScalarKind::String,
            Value::Timestamp(_) => ScalarKind::Timestamp,
            _ => return None,
        };
        Some(kind)
    }

    /// Type name of the concrete value
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Nullable(held) => held.kind().name().to_string(),
            Value::Sequence(_) => "sequence".to_string(),
            Value::Mapping(_) => "mapping".to_string(),
            Value::Record(record) => record.schema().name().to_string(),
            Value::Custom(custom) => custom.type_name().to_string(),
            Value::Dynamic(inner) => format!("dynamic({})", inner.type_name()),
            scalar => scalar
                .scalar_kind()
                .map_or("scalar", ScalarKind::name)
                .to_string(),
        }
    }

    /// The value held behind any number of dynamic wrappers
    pub fn concrete(&self) -> &Value {
        match self {
            Value::Dynamic(inner) => inner.concrete(),
            other => other,
        }
    }

    /// Owned variant of [`Value::concrete`]
    pub fn into_concrete(self) -> Value {
        match self {
            Value::Dynamic(inner) => inner.into_concrete(),
            other => other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.concrete() {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Look up a mapping entry or record field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.concrete() {
            Value::Mapping(entries) => entries.get(name),
            Value::Record(record) => record.get(name),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

/// Record instance: shared schema plus field values in declaration order
#[derive(Clone)]
pub struct RecordValue {
    schema: Arc<RecordSchema>,
    fields: Vec<Value>,
}

impl RecordValue {
    /// Create a record; missing trailing fields are filled with zero values
    pub fn new(schema: Arc<RecordSchema>, mut fields: Vec<Value>) -> Self {
        let declared = schema.fields();
        let present = fields.len();
        if present < declared.len() {
            fields.extend(declared[present..].iter().map(|field| field.ty().zero()));
        }
        fields.truncate(declared.len());
        Self { schema, fields }
    }

    /// Record with every field at its zero value
    pub fn zero(schema: Arc<RecordSchema>) -> Self {
        let fields = schema.fields().iter().map(|field| field.ty().zero()).collect();
        Self { schema, fields }
    }

    /// Extract a record of the given schema from `value`; absent reads as zero
    pub fn expect(value: Value, schema: &Arc<RecordSchema>) -> Result<Self> {
        match value.into_concrete() {
            Value::Record(record) if record.schema.name() == schema.name() => Ok(record),
            Value::Null => Ok(Self::zero(Arc::clone(schema))),
            other => Err(Error::type_mismatch(schema.name(), &other)),
        }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Value] {
        &mut self.fields
    }

    pub fn into_fields(self) -> Vec<Value> {
        self.fields
    }

    /// Field value by declared name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).and_then(|index| self.fields.get(index))
    }

    /// Iterate `(field name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .iter()
            .map(|field| field.name())
            .zip(self.fields.iter())
    }
}

impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.fields == other.fields
    }
}

impl fmt::Debug for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(self.schema.name());
        for (name, value) in self.iter() {
            debug.field(name, value);
        }
        debug.finish()
    }
}

/// Instance of a named custom type
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    type_name: Cow<'static, str>,
    inner: Box<Value>,
}

impl CustomValue {
    pub fn new(type_name: impl Into<Cow<'static, str>>, inner: Value) -> Self {
        Self {
            type_name: type_name.into(),
            inner: Box::new(inner),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn inner(&self) -> &Value {
        &self.inner
    }

    pub fn into_inner(self) -> Value {
        *self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScalarKind, TypeDesc};

    fn point_schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::builder("Point")
                .field("x", TypeDesc::Scalar(ScalarKind::I32), &[])
                .field("y", TypeDesc::Scalar(ScalarKind::I32), &["vertical"])
                .build(),
        )
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::I16(1).type_name(), "i16");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::dynamic("x").type_name(), "dynamic(string)");
        assert_eq!(Value::Sequence(vec![]).type_name(), "sequence");
    }

    #[test]
    fn test_concrete_strips_all_dynamic_levels() {
        let nested = Value::Dynamic(Box::new(Value::dynamic(7i64)));
        assert_eq!(nested.concrete(), &Value::I64(7));
        assert_eq!(nested.into_concrete(), Value::I64(7));
    }

    #[test]
    fn test_record_new_pads_missing_fields() {
        let record = RecordValue::new(point_schema(), vec![Value::I32(4)]);
        assert_eq!(record.fields(), &[Value::I32(4), Value::I32(0)]);
        assert_eq!(record.get("y"), Some(&Value::I32(0)));
        assert_eq!(record.get("z"), None);
    }

    #[test]
    fn test_record_expect() {
        let schema = point_schema();
        let zero = RecordValue::expect(Value::Null, &schema).unwrap();
        assert_eq!(zero, RecordValue::zero(Arc::clone(&schema)));

        let err = RecordValue::expect(Value::I64(1), &schema).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_mapping_builder_and_lookup() {
        let value = Value::mapping([("name", Value::from("Ada")), ("age", Value::from(36i64))]);
        assert_eq!(value.get("name").and_then(Value::as_str), Some("Ada"));
        assert_eq!(value.get("age"), Some(&Value::I64(36)));
    }

    #[test]
    fn test_record_debug_uses_field_names() {
        let record = RecordValue::new(point_schema(), vec![Value::I32(1), Value::I32(2)]);
        let rendered = format!("{:?}", record);
        assert_eq!(rendered, "Point { x: I32(1), y: I32(2) }");
    }
}
