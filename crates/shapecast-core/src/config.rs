//! Per-call conversion options
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default layout used when formatting timestamps into strings and parsing
/// timestamp strings found in mappings (`YYYY-MM-DD HH:MM:SS`)
pub const DEFAULT_TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// How structural faults (pairings with no conversion rule) are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Return the fault to the caller as an error
    #[default]
    Surface,
    /// Log the fault at the outermost call and return success with a
    /// partially populated destination
    Swallow,
}

impl fmt::Display for FaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultPolicy::Surface => write!(f, "surface"),
            FaultPolicy::Swallow => write!(f, "swallow"),
        }
    }
}

/// Options for a single conversion call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// chrono strftime layout for timestamp <-> string conversions
    pub timestamp_layout: String,
    /// Reporting policy for structural faults
    pub fault_policy: FaultPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            timestamp_layout: DEFAULT_TIMESTAMP_LAYOUT.to_string(),
            fault_policy: FaultPolicy::Surface,
        }
    }
}

impl ConvertOptions {
    /// Create options with the default layout and fault policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different timestamp layout
    pub fn with_timestamp_layout(mut self, layout: impl Into<String>) -> Self {
        self.timestamp_layout = layout.into();
        self
    }

    /// Use a different fault policy
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Load options from a JSON document; missing keys keep their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject layouts chrono cannot format with
    pub fn validate(&self) -> Result<()> {
        if self.timestamp_layout.trim().is_empty() {
            return Err(Error::Configuration {
                message: "timestamp_layout must not be empty".to_string(),
            });
        }

        if StrftimeItems::new(&self.timestamp_layout).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Configuration {
                message: format!("invalid timestamp_layout: {:?}", self.timestamp_layout),
            });
        }

        Ok(())
    }
}
