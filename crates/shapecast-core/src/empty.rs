//! Emptiness predicate
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::nullable::NullableValue;
use crate::value::Value;

/// True when `value` equals the zero value of its type
pub fn is_empty<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl Value {
    /// True when absent or structurally equal to the zero value of its own type
    ///
    /// Records are zero when every field is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Dynamic(inner) => inner.is_zero(),
            Value::Nullable(held) => *held == NullableValue::zero(held.kind()),
            Value::Sequence(items) => items.is_empty(),
            Value::Mapping(entries) => entries.is_empty(),
            Value::Record(record) => record.fields().iter().all(Value::is_zero),
            Value::Custom(custom) => custom.inner().is_zero(),
            scalar => scalar
                .scalar_kind()
                .is_some_and(|kind| *scalar == kind.zero()),
        }
    }
}
