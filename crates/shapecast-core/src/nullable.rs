//! Nullable adapter
//!
//! The four built-in nullable shapes, each a scalar plus a presence flag.
//! Unwrapping an absent wrapper yields the primitive's zero value.
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::convert::scalar::Number;
use crate::types::{NullableKind, ScalarKind};
use crate::value::Value;
use chrono::{DateTime, Utc};

/// A scalar with a presence flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nullable<T> {
    pub value: T,
    pub valid: bool,
}

impl<T> Nullable<T> {
    /// A present value
    pub fn new(value: T) -> Self {
        Self { value, valid: true }
    }

    /// The held value when present
    pub fn get(&self) -> Option<&T> {
        self.valid.then_some(&self.value)
    }
}

impl<T: Default> Nullable<T> {
    /// An absent value
    pub fn null() -> Self {
        Self::default()
    }
}

pub type NullString = Nullable<String>;
pub type NullInt64 = Nullable<i64>;
pub type NullFloat64 = Nullable<f64>;
pub type NullTime = Nullable<DateTime<Utc>>;

/// One of the built-in nullable instances
#[derive(Debug, Clone, PartialEq)]
pub enum NullableValue {
    String(NullString),
    Int64(NullInt64),
    Float64(NullFloat64),
    Time(NullTime),
}

impl NullableValue {
    pub fn kind(&self) -> NullableKind {
        match self {
            NullableValue::String(_) => NullableKind::String,
            NullableValue::Int64(_) => NullableKind::Int64,
            NullableValue::Float64(_) => NullableKind::Float64,
            NullableValue::Time(_) => NullableKind::Time,
        }
    }

    /// Absent wrapper of the given kind
    pub fn zero(kind: NullableKind) -> Self {
        match kind {
            NullableKind::String => NullableValue::String(Nullable::null()),
            NullableKind::Int64 => NullableValue::Int64(Nullable::null()),
            NullableKind::Float64 => NullableValue::Float64(Nullable::null()),
            NullableKind::Time => NullableValue::Time(Nullable::null()),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            NullableValue::String(held) => held.valid,
            NullableValue::Int64(held) => held.valid,
            NullableValue::Float64(held) => held.valid,
            NullableValue::Time(held) => held.valid,
        }
    }

    /// The held scalar as a bare value; absent reads as zero
    pub fn held(&self) -> Value {
        match self {
            NullableValue::String(held) => Value::String(held.get().cloned().unwrap_or_default()),
            NullableValue::Int64(held) => Value::I64(held.get().copied().unwrap_or_default()),
            NullableValue::Float64(held) => Value::F64(held.get().copied().unwrap_or_default()),
            NullableValue::Time(held) => Value::Timestamp(held.get().copied().unwrap_or_default()),
        }
    }
}

impl From<NullString> for NullableValue {
    fn from(held: NullString) -> Self {
        NullableValue::String(held)
    }
}

impl From<NullInt64> for NullableValue {
    fn from(held: NullInt64) -> Self {
        NullableValue::Int64(held)
    }
}

impl From<NullFloat64> for NullableValue {
    fn from(held: NullFloat64) -> Self {
        NullableValue::Float64(held)
    }
}

impl From<NullTime> for NullableValue {
    fn from(held: NullTime) -> Self {
        NullableValue::Time(held)
    }
}

/// Read a nullable into a bare scalar of `target` kind
pub(crate) fn unwrap(held: &NullableValue, target: ScalarKind) -> Option<Value> {
    let bare = held.held();
    match (held.kind(), target) {
        (NullableKind::Int64, kind) if kind.is_integer() => Number::of(&bare)?.cast(kind),
        (NullableKind::Float64, kind) if kind.is_float() => Number::of(&bare)?.cast(kind),
        (NullableKind::String, ScalarKind::String) => Some(bare),
        (NullableKind::Time, ScalarKind::Timestamp) => Some(bare),
        _ => None,
    }
}

/// Wrap a bare scalar into a present nullable of `target` kind
pub(crate) fn wrap(value: &Value, target: NullableKind) -> Option<Value> {
    let source = value.scalar_kind()?;
    let held = match target {
        NullableKind::Int64 if source.is_integer() => {
            match Number::of(value)?.cast(ScalarKind::I64)? {
                Value::I64(n) => NullableValue::Int64(Nullable::new(n)),
                _ => return None,
            }
        }
        NullableKind::Float64 if source.is_float() => {
            match Number::of(value)?.cast(ScalarKind::F64)? {
                Value::F64(n) => NullableValue::Float64(Nullable::new(n)),
                _ => return None,
            }
        }
        NullableKind::String => match value {
            Value::String(text) => NullableValue::String(Nullable::new(text.clone())),
            _ => return None,
        },
        NullableKind::Time => match value {
            Value::Timestamp(at) => NullableValue::Time(Nullable::new(*at)),
            _ => return None,
        },
        _ => return None,
    };
    Some(Value::Nullable(held))
}
