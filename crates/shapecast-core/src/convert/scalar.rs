//! Scalar coercion rules
//!
//! Ordered rule table applied when a scalar (or nullable, or custom) value
//! lands in a slot of a different declared type. The first applicable rule
//! wins; `None` means no rule applies.
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::nullable;
use crate::types::{ScalarKind, TypeDesc};
use crate::value::Value;
use anyhow::anyhow;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt::Write;

/// Numeric intermediate used for width and signedness changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    pub(crate) fn of(value: &Value) -> Option<Self> {
        let number = match *value {
            Value::I8(n) => Number::Signed(i64::from(n)),
            Value::I16(n) => Number::Signed(i64::from(n)),
            Value::I32(n) => Number::Signed(i64::from(n)),
            Value::I64(n) => Number::Signed(n),
            Value::U8(n) => Number::Unsigned(u64::from(n)),
            Value::U16(n) => Number::Unsigned(u64::from(n)),
            Value::U32(n) => Number::Unsigned(u64::from(n)),
            Value::U64(n) => Number::Unsigned(n),
            Value::F32(n) => Number::Float(f64::from(n)),
            Value::F64(n) => Number::Float(n),
            _ => return None,
        };
        Some(number)
    }

    // Float to integer truncates toward zero.
    fn as_i64(self) -> i64 {
        match self {
            Number::Signed(n) => n,
            Number::Unsigned(n) => n as i64,
            Number::Float(n) => n as i64,
        }
    }

    fn as_u64(self) -> u64 {
        match self {
            Number::Signed(n) => n as u64,
            Number::Unsigned(n) => n,
            Number::Float(n) => n as u64,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Signed(n) => n as f64,
            Number::Unsigned(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    /// Narrow or widen into `kind`; integers keep their low bits
    pub(crate) fn cast(self, kind: ScalarKind) -> Option<Value> {
        let value = match kind {
            ScalarKind::I8 => Value::I8(self.as_i64() as i8),
            ScalarKind::I16 => Value::I16(self.as_i64() as i16),
            ScalarKind::I32 => Value::I32(self.as_i64() as i32),
            ScalarKind::I64 => Value::I64(self.as_i64()),
            ScalarKind::U8 => Value::U8(self.as_u64() as u8),
            ScalarKind::U16 => Value::U16(self.as_u64() as u16),
            ScalarKind::U32 => Value::U32(self.as_u64() as u32),
            ScalarKind::U64 => Value::U64(self.as_u64()),
            ScalarKind::F32 => Value::F32(self.as_f64() as f32),
            ScalarKind::F64 => Value::F64(self.as_f64()),
            _ => return None,
        };
        Some(value)
    }
}

/// Apply the first coercion rule that fits `source` into `target`
pub(crate) fn coerce(source: &Value, target: &TypeDesc, layout: &str) -> Option<Value> {
    if target.matches(source) {
        return Some(source.clone());
    }

    match (source, target) {
        (_, TypeDesc::Optional(inner)) => coerce(source, inner, layout),
        (Value::Custom(custom), _) => coerce(custom.inner(), target, layout),
        (Value::Timestamp(at), TypeDesc::Scalar(ScalarKind::String)) => {
            format_timestamp(at, layout).map(Value::String)
        }
        (Value::Nullable(held), TypeDesc::Scalar(kind)) => nullable::unwrap(held, *kind),
        (_, TypeDesc::Scalar(kind)) if kind.is_numeric() => Number::of(source)?.cast(*kind),
        (_, TypeDesc::Nullable(kind)) => nullable::wrap(source, *kind),
        (_, TypeDesc::Custom(custom)) if custom.parser().is_none() => {
            coerce(source, custom.repr(), layout).map(|inner| custom.wrap(inner))
        }
        _ => None,
    }
}

/// Render a timestamp with a strftime layout; `None` if the layout is malformed
pub(crate) fn format_timestamp(at: &DateTime<Utc>, layout: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", at.format(layout)).ok()?;
    Some(rendered)
}

/// Parse a timestamp string with `layout`, falling back to RFC 3339
pub(crate) fn parse_timestamp(text: &str, layout: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, layout)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|at| at.with_timezone(&Utc))
        })
}

/// Base-10 parse of `text` into a numeric kind, narrowed like any other cast
pub(crate) fn parse_numeric(text: &str, kind: ScalarKind) -> anyhow::Result<Value> {
    let number = if kind.is_signed() {
        Number::Signed(text.parse::<i64>()?)
    } else if kind.is_unsigned() {
        Number::Unsigned(text.parse::<u64>()?)
    } else if kind.is_float() {
        Number::Float(text.parse::<f64>()?)
    } else {
        return Err(anyhow!("{} is not a numeric kind", kind));
    };

    number
        .cast(kind)
        .ok_or_else(|| anyhow!("cannot represent {:?} as {}", text, kind))
}
