//! Parameter metadata recovered by the external static-analysis pass.
//!
//! The dynamic core's method table carries types but no parameter names;
//! those are recovered from source by a separate pass and handed to the
//! generator as a lookup table keyed by (entity, method).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Lookup key for method metadata. `entity` is empty for methods the
/// core itself provides (not tied to any entity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub entity: String,
    pub method: String,
}

impl MethodRef {
    pub fn new(entity: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            method: method.into(),
        }
    }
}

/// Parameter names and doc text for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodAstData {
    /// Ordered parameter names, matching the signature in the registry.
    pub params: Vec<String>,

    /// Documentation text, if the source carried any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// One row of the serialized metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstEntry {
    /// Owning entity name; empty for entity-less default entries.
    #[serde(default)]
    pub entity: String,
    pub method: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// The full metadata table.
#[derive(Debug, Clone, Default)]
pub struct AstIndex {
    entries: HashMap<MethodRef, MethodAstData>,
}

impl AstIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from serialized rows. Later rows win on
    /// duplicate keys.
    pub fn from_entries(entries: Vec<AstEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(
                MethodRef::new(entry.entity, entry.method),
                MethodAstData {
                    params: entry.params,
                    doc: entry.doc,
                },
            );
        }
        index
    }

    pub fn insert(&mut self, key: MethodRef, data: MethodAstData) {
        self.entries.insert(key, data);
    }

    pub fn get(&self, key: &MethodRef) -> Option<&MethodAstData> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_entries_builds_lookup() {
        let index = AstIndex::from_entries(vec![
            AstEntry {
                entity: "Partner".to_string(),
                method: "Greeting".to_string(),
                params: vec![],
                doc: Some("Returns a greeting.".to_string()),
            },
            AstEntry {
                entity: String::new(),
                method: "Copy".to_string(),
                params: vec!["overrides".to_string()],
                doc: None,
            },
        ]);

        assert_eq!(index.len(), 2);
        let data = index.get(&MethodRef::new("Partner", "Greeting")).unwrap();
        assert_eq!(data.doc.as_deref(), Some("Returns a greeting."));
        assert!(index.get(&MethodRef::new("", "Copy")).is_some());
        assert!(index.get(&MethodRef::new("Partner", "Copy")).is_none());
    }
}
