//! Caller-supplied conversion hooks
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::types::TypeDesc;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A conversion hook: turns a raw dynamic value into a destination value
pub type HookFn = dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync;

/// Ordered hook chain, consulted for dynamically-typed sources
///
/// The first hook that succeeds with a value of the destination's declared
/// type wins; later hooks are not called.
#[derive(Clone, Default)]
pub struct Hooks {
    chain: Vec<Arc<HookFn>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook, builder style
    pub fn with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.push(hook);
        self
    }

    pub fn push<F>(&mut self, hook: F)
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.chain.push(Arc::new(hook));
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// First hook result of type `ty`, in registration order
    pub(crate) fn resolve(&self, raw: &Value, ty: &TypeDesc) -> Option<Value> {
        for (index, hook) in self.chain.iter().enumerate() {
            match hook(raw) {
                Ok(result) if ty.matches(&result) => return Some(result),
                Ok(result) => log::trace!(
                    "Hook #{} produced {} where {} is declared",
                    index,
                    result.type_name(),
                    ty
                ),
                Err(err) => log::trace!("Hook #{} declined {}: {}", index, raw.type_name(), err),
            }
        }
        None
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").field("len", &self.chain.len()).finish()
    }
}
