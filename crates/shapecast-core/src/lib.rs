//! Shapecast Core - Type-directed value conversion
//!
//! This crate populates a destination value from a source value of possibly
//! different shape: keyed mappings, fixed-field records, sequences, scalars,
//! nullable wrappers and dynamically-typed containers. Fields are matched by
//! name or declared alias, and scalars are coerced between compatible
//! representations.
//!
//! # Main Components
//!
//! - **Value Tree**: [`Value`] and the declared-type descriptors in [`types`]
//! - **Field Resolver**: [`RecordSchema`] alias tables
//! - **Traversal Engine**: [`Converter`], with the scalar rule table and the
//!   [`Hooks`] chain
//! - **Typed Bridge**: [`Shape`], [`Record`], [`Parser`] and [`impl_record!`]
//!
//! # Example
//!
//! ```
//! use shapecast_core::{impl_record, Converter, Result, Value};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     name: String,
//!     date_birth: chrono::DateTime<chrono::Utc>,
//! }
//!
//! impl_record!(User {
//!     name: String,
//!     date_birth: chrono::DateTime<chrono::Utc>,
//! });
//!
//! fn example() -> Result<()> {
//!     let source = Value::from_json_str(
//!         r#"{"name": "Test Second", "date_birth": "1977-12-11 12:21:50"}"#,
//!     )?;
//!     let mut user = User::default();
//!     Converter::new().convert(&source, &mut user)?;
//!     assert_eq!(user.name, "Test Second");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod convert;
pub mod empty;
pub mod error;
pub mod json;
pub mod nullable;
pub mod schema;
pub mod shape;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use config::{ConvertOptions, FaultPolicy, DEFAULT_TIMESTAMP_LAYOUT};
pub use convert::{Converter, HookFn, Hooks};
pub use empty::is_empty;
pub use error::{Error, Result};
pub use nullable::{NullFloat64, NullInt64, NullString, NullTime, Nullable, NullableValue};
pub use schema::{parse_tag, FieldDesc, RecordSchema, RecordSchemaBuilder};
pub use shape::{parse_into, Parser, Record, Shape};
pub use types::{CustomType, NullableKind, ParseFn, ScalarKind, TypeDesc};
pub use value::{CustomValue, RecordValue, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Populate `destination` from `source` with default options and `hooks`
pub fn convert<S: Shape, D: Shape>(source: &S, destination: &mut D, hooks: &Hooks) -> Result<()> {
    Converter::new()
        .with_hooks(hooks.clone())
        .convert(source, destination)
}
