//! Typed bridge between Rust types and [`Value`]
//!
//! [`Shape`] lets a Rust type describe its declared type and move to and
//! from the dynamic value tree. Plain structs get an implementation through
//! [`impl_record!`](crate::impl_record), which also builds the alias table
//! once per type.
//!
//! # Example
//!
//! ```
//! use shapecast_core::{convert, impl_record, Hooks};
//!
//! #[derive(Debug, Default)]
//! struct Source {
//!     name: String,
//!     age: i64,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Target {
//!     full_name: String,
//!     age: u8,
//! }
//!
//! impl_record!(Source { name: String => ["full_name"], age: i64 });
//! impl_record!(Target { full_name: String => ["full_name"], age: u8 });
//!
//! let source = Source { name: "Ada".to_string(), age: 36 };
//! let mut target = Target::default();
//! convert(&source, &mut target, &Hooks::new()).unwrap();
//! assert_eq!(target.full_name, "Ada");
//! assert_eq!(target.age, 36);
//! ```
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::nullable::{NullFloat64, NullInt64, NullString, NullTime, NullableValue};
use crate::schema::RecordSchema;
use crate::types::{NullableKind, ScalarKind, TypeDesc};
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A Rust type the engine can read from and write into
pub trait Shape: Sized {
    /// Declared type of a slot holding `Self`
    fn type_desc() -> TypeDesc;

    fn to_value(&self) -> Value;

    /// Rebuild from a value of this shape; an absent value reads as zero
    fn from_value(value: Value) -> Result<Self>;
}

/// A fixed-field record type with a cached schema
pub trait Record: Shape {
    fn schema() -> Arc<RecordSchema>;
}

/// Self-parsing capability: the destination builds itself from a raw value
pub trait Parser {
    fn parse(&mut self, raw: &Value) -> anyhow::Result<()>;
}

/// Parse capability for a [`CustomType`](crate::CustomType) backed by `T`
pub fn parse_into<T>(raw: &Value) -> anyhow::Result<Value>
where
    T: Parser + Shape + Default,
{
    let mut parsed = T::default();
    parsed.parse(raw)?;
    Ok(parsed.to_value())
}

macro_rules! scalar_shape {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Shape for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::Scalar(ScalarKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::$kind(*self)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value.into_concrete() {
                        Value::$kind(inner) => Ok(inner),
                        Value::Null => Ok(Self::default()),
                        other => Err(Error::type_mismatch(ScalarKind::$kind.name(), &other)),
                    }
                }
            }
        )*
    };
}

scalar_shape! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    DateTime<Utc> => Timestamp,
}

impl Shape for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::String)
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value.into_concrete() {
            Value::String(inner) => Ok(inner),
            Value::Null => Ok(Self::default()),
            other => Err(Error::type_mismatch(ScalarKind::String.name(), &other)),
        }
    }
}

macro_rules! nullable_shape {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Shape for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::Nullable(NullableKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::Nullable(NullableValue::$kind(self.clone()))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value.into_concrete() {
                        Value::Nullable(NullableValue::$kind(inner)) => Ok(inner),
                        Value::Null => Ok(Self::default()),
                        other => Err(Error::type_mismatch(NullableKind::$kind.name(), &other)),
                    }
                }
            }
        )*
    };
}

nullable_shape! {
    NullString => String,
    NullInt64 => Int64,
    NullFloat64 => Float64,
    NullTime => Time,
}

impl<T: Shape> Shape for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::sequence(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(Shape::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value.into_concrete() {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(Error::type_mismatch(Self::type_desc().name(), &other)),
        }
    }
}

impl<T: Shape> Shape for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::optional(T::type_desc())
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Shape::to_value)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            present => T::from_value(present).map(Some),
        }
    }
}

impl<T: Shape> Shape for BTreeMap<String, T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::mapping(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self> {
        match value.into_concrete() {
            Value::Mapping(entries) => entries
                .into_iter()
                .map(|(key, value)| Ok((key, T::from_value(value)?)))
                .collect(),
            Value::Null => Ok(BTreeMap::new()),
            other => Err(Error::type_mismatch(Self::type_desc().name(), &other)),
        }
    }
}

impl<T: Shape> Shape for HashMap<String, T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::mapping(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self> {
        BTreeMap::<String, T>::from_value(value).map(|entries| entries.into_iter().collect())
    }
}

/// `Value` itself is the dynamically-typed slot
impl Shape for Value {
    fn type_desc() -> TypeDesc {
        TypeDesc::Dynamic
    }

    fn to_value(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            other => Value::Dynamic(Box::new(other.clone())),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Dynamic(inner) => *inner,
            other => other,
        })
    }
}

/// Implement [`Record`] and [`Shape`] for a plain struct
///
/// Every listed field must implement [`Shape`]; alias tokens follow `=>`.
/// Fields left out of the list are not visible to the engine and are
/// rebuilt with `Default`. Self-referential record types are not supported.
///
/// ```
/// use shapecast_core::{impl_record, Record};
///
/// #[derive(Debug, Default)]
/// struct Profile {
///     name: String,
///     date_birth: Option<chrono::DateTime<chrono::Utc>>,
/// }
///
/// impl_record!(Profile {
///     name: String,
///     date_birth: Option<chrono::DateTime<chrono::Utc>> => ["dob", "birthday"],
/// });
///
/// assert_eq!(Profile::schema().resolve("dob", &[]), Some(1));
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($field:ident : $fty:ty $(=> [$($alias:expr),* $(,)?])?),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn schema() -> ::std::sync::Arc<$crate::RecordSchema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<$crate::RecordSchema>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(SCHEMA.get_or_init(|| {
                    ::std::sync::Arc::new(
                        $crate::RecordSchema::builder(stringify!($ty))
                            $(
                                .field(
                                    stringify!($field),
                                    <$fty as $crate::Shape>::type_desc(),
                                    &[$($($alias),*)?],
                                )
                            )*
                            .build(),
                    )
                }))
            }
        }

        impl $crate::Shape for $ty {
            fn type_desc() -> $crate::TypeDesc {
                $crate::TypeDesc::Record(<$ty as $crate::Record>::schema())
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record($crate::RecordValue::new(
                    <$ty as $crate::Record>::schema(),
                    vec![$($crate::Shape::to_value(&self.$field)),*],
                ))
            }

            #[allow(clippy::needless_update)]
            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                let record = $crate::RecordValue::expect(value, &<$ty as $crate::Record>::schema())?;
                let mut fields = record.into_fields().into_iter();
                Ok(Self {
                    $($field: <$fty as $crate::Shape>::from_value(fields.next().unwrap_or_default())?,)*
                    ..::std::default::Default::default()
                })
            }
        }
    };
}
