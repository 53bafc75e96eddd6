//! Per-entity definitions: fields, methods, mixins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::FieldType;

/// A field declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field type. Relation fields use [`FieldType::RecordSet`].
    pub ty: FieldType,

    /// Target entity name for relation fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,

    /// Whether the field is persisted by the dynamic core.
    #[serde(default)]
    pub stored: bool,

    /// Whether the field is computed from a related field. Such fields
    /// are usable in filters even when not stored.
    #[serde(default)]
    pub related: bool,
}

impl FieldDef {
    /// Returns true if this field points at another entity.
    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

/// A method declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    /// Documentation recovered by the static-analysis pass, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Parameter types, in order. When `variadic` is true the last entry
    /// is the *element* type of the variable-length tail.
    #[serde(default)]
    pub params: Vec<FieldType>,

    /// Whether the last parameter is variadic.
    #[serde(default)]
    pub variadic: bool,

    /// Return types, in order. Empty = no return value.
    #[serde(default)]
    pub returns: Vec<FieldType>,
}

/// One entity of the registry snapshot.
///
/// Field and method maps are `BTreeMap` so every walk over them is
/// name-ordered — regeneration from an unchanged snapshot must be
/// byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity name (e.g. `Partner`).
    pub name: String,

    /// Declared fields, keyed by field name.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,

    /// Declared methods, keyed by method name.
    #[serde(default)]
    pub methods: BTreeMap<String, MethodDef>,

    /// Mixins applied to this entity, in application order. Mixins are
    /// themselves entities of the registry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,

    /// Entities whose fields are embedded into this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<String>,
}

impl EntityDef {
    /// A bare entity with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            methods: BTreeMap::new(),
            mixins: Vec::new(),
            embeds: Vec::new(),
        }
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }
}
