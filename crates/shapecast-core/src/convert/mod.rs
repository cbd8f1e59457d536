//! Traversal engine
//!
//! [`Converter`] walks a source [`Value`] and writes a destination slot of a
//! declared [`TypeDesc`], dispatching on the destination type and the
//! discovered kind of the source. Mappings, records and sequences recurse;
//! leaves go through the scalar rule table, the hook chain or the
//! destination's parse capability.
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

pub mod hooks;
pub(crate) mod scalar;


pub use hooks::{HookFn, Hooks};

use crate::config::{ConvertOptions, FaultPolicy};
use crate::error::{Error, Result};
use crate::schema::RecordSchema;
use crate::shape::Shape;
use crate::types::{ScalarKind, TypeDesc};
use crate::value::{RecordValue, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Whether a source and destination pair is handled by recursive traversal
fn descends(source: &Value, ty: &TypeDesc) -> bool {
    matches!(
        (source, ty),
        (Value::Mapping(_), TypeDesc::Mapping(_) | TypeDesc::Record(_))
            | (Value::Record(_), TypeDesc::Record(_))
            | (Value::Sequence(_), TypeDesc::Sequence(_))
    )
}

/// Location of the value being converted, rendered as `$.items[2].price`
#[derive(Debug, Clone, Copy)]
enum Trail<'a> {
    Root,
    Field(&'a Trail<'a>, &'a str),
    Index(&'a Trail<'a>, usize),
}

impl fmt::Display for Trail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trail::Root => f.write_str("$"),
            Trail::Field(parent, name) => write!(f, "{}.{}", parent, name),
            Trail::Index(parent, index) => write!(f, "{}[{}]", parent, index),
        }
    }
}

/// Conversion engine configured with options and a hook chain
///
/// A converter holds no per-call state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
    hooks: Hooks,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Register one more hook after the existing ones
    pub fn hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.hooks.push(hook);
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Populate `destination` from `source`
    ///
    /// An absent source leaves the destination untouched. The destination is
    /// only written back when the conversion succeeds, or when a structural
    /// fault is swallowed under [`FaultPolicy::Swallow`].
    pub fn convert<S: Shape, D: Shape>(&self, source: &S, destination: &mut D) -> Result<()> {
        let source = source.to_value();
        if source.is_null() {
            return Ok(());
        }

        let mut target = destination.to_value();
        self.convert_value(&source, &mut target, &D::type_desc())?;
        *destination = D::from_value(target)?;
        Ok(())
    }

    /// Populate a dynamic destination slot of declared type `ty`
    pub fn convert_value(&self, source: &Value, destination: &mut Value, ty: &TypeDesc) -> Result<()> {
        match self.visit(source, destination, ty, &Trail::Root) {
            Err(err) if err.is_structural() && self.options.fault_policy == FaultPolicy::Swallow => {
                log::warn!("Conversion into {} stopped early: {}", ty, err);
                Ok(())
            }
            outcome => outcome,
        }
    }

    fn visit(&self, source: &Value, slot: &mut Value, ty: &TypeDesc, trail: &Trail<'_>) -> Result<()> {
        if source.is_null() {
            return Ok(());
        }

        match ty {
            TypeDesc::Dynamic => {
                *slot = match source {
                    Value::Dynamic(inner) => inner.as_ref().clone(),
                    other => other.clone(),
                };
                return Ok(());
            }
            TypeDesc::Optional(inner) => {
                if slot.is_null() {
                    *slot = inner.zero();
                }
                return self.visit(source, slot, inner, trail);
            }
            _ => {}
        }

        match (source, ty) {
            (Value::Dynamic(inner), _) => self.visit_dynamic(inner, slot, ty, trail),
            (Value::Mapping(entries), TypeDesc::Mapping(elem)) => {
                self.mapping_into_mapping(entries, slot, elem, trail)
            }
            (Value::Mapping(entries), TypeDesc::Record(schema)) => {
                self.mapping_into_record(entries, slot, schema, trail)
            }
            (Value::Record(record), TypeDesc::Record(schema)) => {
                self.record_into_record(record, slot, schema, trail)
            }
            (Value::Sequence(items), TypeDesc::Sequence(elem)) => {
                self.sequence_into_sequence(items, slot, elem, trail)
            }
            _ => self.visit_scalar(source, slot, ty, trail),
        }
    }

    /// Static rules first, then the hook chain, then the held value as is
    fn visit_dynamic(&self, inner: &Value, slot: &mut Value, ty: &TypeDesc, trail: &Trail<'_>) -> Result<()> {
        let concrete = inner.concrete();
        if concrete.is_null() || descends(concrete, ty) {
            return self.visit(concrete, slot, ty, trail);
        }

        if let Some(converted) = scalar::coerce(concrete, ty, &self.options.timestamp_layout) {
            *slot = converted;
            return Ok(());
        }

        if let Some(result) = self.hooks.resolve(concrete, ty) {
            *slot = result;
            return Ok(());
        }

        self.visit(concrete, slot, ty, trail)
    }

    fn visit_scalar(&self, source: &Value, slot: &mut Value, ty: &TypeDesc, trail: &Trail<'_>) -> Result<()> {
        match scalar::coerce(source, ty, &self.options.timestamp_layout) {
            Some(converted) => {
                *slot = converted;
                Ok(())
            }
            None => self.fallback(source, slot, ty, trail),
        }
    }

    /// Parse capability of the destination, or a structural fault
    fn fallback(&self, source: &Value, slot: &mut Value, ty: &TypeDesc, trail: &Trail<'_>) -> Result<()> {
        if let Some(parse) = ty.parser() {
            *slot = parse(source).map_err(|err| Error::Parser {
                type_name: ty.name(),
                path: trail.to_string(),
                source: err,
            })?;
            return Ok(());
        }

        Err(Error::UnsupportedPairing {
            source_type: source.type_name(),
            target_type: ty.name(),
            path: trail.to_string(),
        })
    }

    fn mapping_into_mapping(
        &self,
        entries: &BTreeMap<String, Value>,
        slot: &mut Value,
        elem: &TypeDesc,
        trail: &Trail<'_>,
    ) -> Result<()> {
        let mut merged = match std::mem::take(slot) {
            Value::Mapping(existing) => existing,
            _ => BTreeMap::new(),
        };

        let mut outcome = Ok(());
        for (key, value) in entries {
            if value.concrete().is_null() && !matches!(elem, TypeDesc::Dynamic) {
                continue;
            }
            match self.mapping_entry(value, elem, &Trail::Field(trail, key)) {
                Ok(entry) => {
                    merged.insert(key.clone(), entry);
                }
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        *slot = Value::Mapping(merged);
        outcome
    }

    fn mapping_entry(&self, value: &Value, elem: &TypeDesc, trail: &Trail<'_>) -> Result<Value> {
        if matches!(elem, TypeDesc::Dynamic) {
            return Ok(value.clone());
        }

        let concrete = value.concrete();
        if elem.matches(concrete) {
            return Ok(concrete.clone());
        }

        if let (TypeDesc::Scalar(kind), Value::String(text)) = (elem, concrete) {
            if kind.is_numeric() {
                return scalar::parse_numeric(text, *kind).map_err(|err| Error::Parse {
                    value: text.clone(),
                    target_type: kind.to_string(),
                    path: trail.to_string(),
                    source: err,
                });
            }
        }

        let mut fresh = elem.zero();
        self.visit(value, &mut fresh, elem, trail)?;
        Ok(fresh)
    }

    fn mapping_into_record(
        &self,
        entries: &BTreeMap<String, Value>,
        slot: &mut Value,
        schema: &Arc<RecordSchema>,
        trail: &Trail<'_>,
    ) -> Result<()> {
        let mut record = match std::mem::take(slot) {
            Value::Record(existing) if existing.schema().name() == schema.name() => existing,
            _ => RecordValue::zero(Arc::clone(schema)),
        };

        let mut outcome = Ok(());
        for (key, value) in entries {
            let Some(index) = schema.resolve(key, &[]) else {
                log::trace!("{}: no field of {} answers to key '{}'", trail, schema.name(), key);
                continue;
            };
            let (Some(field), Some(field_slot)) = (schema.field(index), record.fields_mut().get_mut(index)) else {
                continue;
            };

            if let Err(err) = self.mapping_field(value, field_slot, field.ty(), &Trail::Field(trail, field.name())) {
                outcome = Err(err);
                break;
            }
        }

        *slot = Value::Record(record);
        outcome
    }

    /// Convert one dynamically-typed mapping entry into an existing field slot
    fn mapping_field(&self, value: &Value, slot: &mut Value, ty: &TypeDesc, trail: &Trail<'_>) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        match ty {
            TypeDesc::Optional(inner) => {
                if slot.is_null() {
                    *slot = inner.zero();
                }
                return self.mapping_field(value, slot, inner, trail);
            }
            TypeDesc::Dynamic => return self.visit(value, slot, ty, trail),
            _ => {}
        }

        let concrete = value.concrete();
        if let (TypeDesc::Scalar(ScalarKind::Timestamp), Value::String(text)) = (ty, concrete) {
            match scalar::parse_timestamp(text, &self.options.timestamp_layout) {
                Some(at) => *slot = Value::Timestamp(at),
                None => log::debug!("{}: skipping {:?}, not a timestamp", trail, text),
            }
            return Ok(());
        }

        self.visit_dynamic(concrete, slot, ty, trail)
    }

    fn record_into_record(
        &self,
        source: &RecordValue,
        slot: &mut Value,
        schema: &Arc<RecordSchema>,
        trail: &Trail<'_>,
    ) -> Result<()> {
        if source.schema().name() == schema.name() {
            *slot = Value::Record(source.clone());
            return Ok(());
        }

        let mut record = match std::mem::take(slot) {
            Value::Record(existing) if existing.schema().name() == schema.name() => existing,
            _ => RecordValue::zero(Arc::clone(schema)),
        };

        let mut outcome = Ok(());
        for (source_field, value) in source.schema().fields().iter().zip(source.fields()) {
            if value.is_null() {
                continue;
            }
            let Some(index) = schema.resolve(source_field.name(), source_field.aliases()) else {
                log::trace!("{}: {} has no field for '{}'", trail, schema.name(), source_field.name());
                continue;
            };
            let Some(field) = schema.field(index) else {
                continue;
            };

            // Fields declared as "any" carry dynamically-typed values.
            let wrapped;
            let value = if matches!(source_field.ty(), TypeDesc::Dynamic) && !matches!(value, Value::Dynamic(_)) {
                wrapped = Value::Dynamic(Box::new(value.clone()));
                &wrapped
            } else {
                value
            };

            let mut fresh = field.ty().zero();
            if let Err(err) = self.visit(value, &mut fresh, field.ty(), &Trail::Field(trail, field.name())) {
                outcome = Err(err);
                break;
            }
            if let Some(field_slot) = record.fields_mut().get_mut(index) {
                *field_slot = fresh;
            }
        }

        *slot = Value::Record(record);
        outcome
    }

    fn sequence_into_sequence(
        &self,
        items: &[Value],
        slot: &mut Value,
        elem: &TypeDesc,
        trail: &Trail<'_>,
    ) -> Result<()> {
        let mut converted = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut fresh = elem.zero();
            self.visit(item, &mut fresh, elem, &Trail::Index(trail, index))?;
            converted.push(fresh);
        }

        *slot = Value::Sequence(converted);
        Ok(())
    }
}
