//! Declared-type descriptors
//!
//! A [`TypeDesc`] describes the declared type of a destination slot. The
//! engine dispatches on it together with the discovered kind of the source
//! [`Value`], so an empty destination container still knows what to hold.
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::nullable::NullableValue;
use crate::schema::RecordSchema;
use crate::value::{CustomValue, RecordValue, Value};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Primitive scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Timestamp,
}

impl ScalarKind {
    /// Type name used in error messages and type matching
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "string",
            ScalarKind::Timestamp => "timestamp",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Zero value of this kind
    pub fn zero(self) -> Value {
        match self {
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::I8 => Value::I8(0),
            ScalarKind::I16 => Value::I16(0),
            ScalarKind::I32 => Value::I32(0),
            ScalarKind::I64 => Value::I64(0),
            ScalarKind::U8 => Value::U8(0),
            ScalarKind::U16 => Value::U16(0),
            ScalarKind::U32 => Value::U32(0),
            ScalarKind::U64 => Value::U64(0),
            ScalarKind::F32 => Value::F32(0.0),
            ScalarKind::F64 => Value::F64(0.0),
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::Timestamp => Value::Timestamp(DateTime::<Utc>::default()),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four built-in nullable shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullableKind {
    String,
    Int64,
    Float64,
    Time,
}

impl NullableKind {
    pub fn name(self) -> &'static str {
        match self {
            NullableKind::String => "NullString",
            NullableKind::Int64 => "NullInt64",
            NullableKind::Float64 => "NullFloat64",
            NullableKind::Time => "NullTime",
        }
    }

    /// Scalar kind held by the wrapper
    pub fn base(self) -> ScalarKind {
        match self {
            NullableKind::String => ScalarKind::String,
            NullableKind::Int64 => ScalarKind::I64,
            NullableKind::Float64 => ScalarKind::F64,
            NullableKind::Time => ScalarKind::Timestamp,
        }
    }
}

impl fmt::Display for NullableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse capability: builds a destination value from a raw source value
pub type ParseFn = fn(&Value) -> anyhow::Result<Value>;

/// A named type wrapping an underlying representation
#[derive(Clone)]
pub struct CustomType {
    name: Cow<'static, str>,
    repr: Box<TypeDesc>,
    parser: Option<ParseFn>,
}

impl CustomType {
    pub fn new(name: impl Into<Cow<'static, str>>, repr: TypeDesc) -> Self {
        Self {
            name: name.into(),
            repr: Box::new(repr),
            parser: None,
        }
    }

    /// Attach a parse capability, used as the conversion target of last resort
    pub fn with_parser(mut self, parser: ParseFn) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repr(&self) -> &TypeDesc {
        &self.repr
    }

    pub fn parser(&self) -> Option<ParseFn> {
        self.parser
    }

    /// Wrap an underlying value as an instance of this type
    pub fn wrap(&self, inner: Value) -> Value {
        Value::Custom(CustomValue::new(self.name.clone(), inner))
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.name)
            .field("repr", &self.repr)
            .field("parser", &self.parser.is_some())
            .finish()
    }
}

/// Declared type of a destination slot
#[derive(Debug, Clone)]
pub enum TypeDesc {
    Scalar(ScalarKind),
    Nullable(NullableKind),
    Sequence(Box<TypeDesc>),
    Mapping(Box<TypeDesc>),
    Record(Arc<RecordSchema>),
    /// Pointer-like wrapper that may be absent
    Optional(Box<TypeDesc>),
    Custom(CustomType),
    /// Holds any value; concrete shape discovered at conversion time
    Dynamic,
}

impl TypeDesc {
    pub fn sequence(elem: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(elem))
    }

    pub fn mapping(elem: TypeDesc) -> Self {
        TypeDesc::Mapping(Box::new(elem))
    }

    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Optional(Box::new(inner))
    }

    pub fn record(schema: RecordSchema) -> Self {
        TypeDesc::Record(Arc::new(schema))
    }

    /// Declared type name, e.g. `i64`, `[]OrderItem`, `map[string]f64`
    pub fn name(&self) -> String {
        match self {
            TypeDesc::Scalar(kind) => kind.name().to_string(),
            TypeDesc::Nullable(kind) => kind.name().to_string(),
            TypeDesc::Sequence(elem) => format!("[]{}", elem.name()),
            TypeDesc::Mapping(elem) => format!("map[string]{}", elem.name()),
            TypeDesc::Record(schema) => schema.name().to_string(),
            TypeDesc::Optional(inner) => format!("*{}", inner.name()),
            TypeDesc::Custom(custom) => custom.name().to_string(),
            TypeDesc::Dynamic => "any".to_string(),
        }
    }

    /// Zero value written into freshly allocated slots
    pub fn zero(&self) -> Value {
        match self {
            TypeDesc::Scalar(kind) => kind.zero(),
            TypeDesc::Nullable(kind) => Value::Nullable(NullableValue::zero(*kind)),
            TypeDesc::Sequence(_) => Value::Sequence(Vec::new()),
            TypeDesc::Mapping(_) => Value::Mapping(BTreeMap::new()),
            TypeDesc::Record(schema) => Value::Record(RecordValue::zero(Arc::clone(schema))),
            TypeDesc::Optional(_) | TypeDesc::Dynamic => Value::Null,
            TypeDesc::Custom(custom) => custom.wrap(custom.repr().zero()),
        }
    }

    /// Parse capability exposed by this type, if any
    pub fn parser(&self) -> Option<ParseFn> {
        match self {
            TypeDesc::Custom(custom) => custom.parser(),
            _ => None,
        }
    }

    /// Whether `value` already has exactly this declared type
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeDesc::Dynamic, _) => true,
            (TypeDesc::Optional(inner), value) => !value.is_null() && inner.matches(value),
            (TypeDesc::Scalar(kind), value) => value.scalar_kind() == Some(*kind),
            (TypeDesc::Nullable(kind), Value::Nullable(held)) => held.kind() == *kind,
            (TypeDesc::Sequence(elem), Value::Sequence(items)) => {
                items.iter().all(|item| elem.matches(item))
            }
            (TypeDesc::Mapping(elem), Value::Mapping(entries)) => {
                entries.values().all(|entry| elem.matches(entry))
            }
            (TypeDesc::Record(schema), Value::Record(record)) => {
                schema.name() == record.schema().name()
            }
            (TypeDesc::Custom(custom), Value::Custom(value)) => custom.name() == value.type_name(),
            _ => false,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
