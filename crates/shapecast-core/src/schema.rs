//! Record schemas and field resolution
//!
//! A [`RecordSchema`] is the alias table of one record type: its fields in
//! declaration order, each with a declared type and alias tokens. Schemas
//! are built once per type and shared behind an `Arc`.
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use crate::types::TypeDesc;
use crate::value::Value;
use std::collections::HashMap;

/// One declared field of a record
#[derive(Debug, Clone)]
pub struct FieldDesc {
    name: String,
    ty: TypeDesc,
    aliases: Vec<String>,
}

impl FieldDesc {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn answers_to(&self, name: &str, source_aliases: &[String]) -> bool {
        self.aliases
            .iter()
            .any(|alias| alias == name || source_aliases.contains(alias))
    }
}

/// Field table of a record type
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldDesc>,
    by_name: HashMap<String, usize>,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDesc> {
        self.fields.get(index)
    }

    /// Index of the field declared as `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Zero value of every field, in declaration order
    pub fn zero_fields(&self) -> Vec<Value> {
        self.fields.iter().map(|field| field.ty.zero()).collect()
    }

    /// Find the destination field for a source field
    ///
    /// An exact name match wins. Otherwise the first field in declaration
    /// order with an alias equal to `name` or to one of `source_aliases`.
    pub fn resolve(&self, name: &str, source_aliases: &[String]) -> Option<usize> {
        self.index_of(name).or_else(|| {
            self.fields
                .iter()
                .position(|field| field.answers_to(name, source_aliases))
        })
    }
}

/// Builder for [`RecordSchema`]
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldDesc>,
}

impl RecordSchemaBuilder {
    /// Declare a field with explicit alias tokens
    pub fn field(mut self, name: impl Into<String>, ty: TypeDesc, aliases: &[&str]) -> Self {
        let name = name.into();
        if self.fields.iter().any(|field| field.name == name) {
            log::warn!(
                "Duplicate field '{}' in record '{}' ignored",
                name,
                self.name
            );
            return self;
        }

        self.fields.push(FieldDesc {
            name,
            ty,
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        });
        self
    }

    /// Declare a field whose aliases come from a struct-tag annotation
    pub fn tagged_field(self, name: impl Into<String>, ty: TypeDesc, tag: &str) -> Self {
        let tokens = parse_tag(tag);
        let aliases: Vec<&str> = tokens.iter().map(String::as_str).collect();
        self.field(name, ty, &aliases)
    }

    pub fn build(self) -> RecordSchema {
        let by_name = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name.clone(), index))
            .collect();

        RecordSchema {
            name: self.name,
            fields: self.fields,
            by_name,
        }
    }
}

/// Extract alias tokens from a tag such as `json:"name,omitempty" bson:"nm"`
///
/// Each `key:"value"` pair contributes the first comma-delimited token of
/// its value. Empty and `-` tokens are dropped.
pub fn parse_tag(tag: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for part in tag.split_whitespace() {
        let Some((_, quoted)) = part.split_once(':') else {
            continue;
        };
        let value = quoted.trim_matches('"');
        let token = value.split(',').next().unwrap_or_default().trim();
        if token.is_empty() || token == "-" || tokens.iter().any(|known| known == token) {
            continue;
        }
        tokens.push(token.to_string());
    }
    tokens
}
