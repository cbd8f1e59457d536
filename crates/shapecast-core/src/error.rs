//! Error types for the Shapecast core library
//!
//! This module defines the error handling system for the conversion engine,
//! using thiserror for error definitions and anyhow for errors raised by
//! caller-supplied hooks and parsers.
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use thiserror::Error;

/// Main error type for Shapecast operations
#[derive(Error, Debug)]
pub enum Error {
    /// No conversion rule applies to the source/destination pairing
    #[error("Unsupported type pairing: cannot convert {source_type} into {target_type} at {path}")]
    UnsupportedPairing {
        source_type: String,
        target_type: String,
        path: String,
    },

    /// A textual value could not be parsed into the destination kind
    #[error("Parse error at {path}: cannot read {value:?} as {target_type}")]
    Parse {
        value: String,
        target_type: String,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// A destination's parse capability rejected the raw value
    #[error("Parser for {type_name} failed at {path}: {source}")]
    Parser {
        type_name: String,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// A value does not have the shape its declared type requires
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a type mismatch error for a value that did not fit `expected`
    pub fn type_mismatch(expected: impl Into<String>, found: &Value) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.type_name(),
        }
    }

    /// Whether this error is a structural fault rather than a local coercion failure
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::UnsupportedPairing { .. })
    }

    /// Location of the failing value, when the error carries one
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::UnsupportedPairing { path, .. }
            | Error::Parse { path, .. }
            | Error::Parser { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
