//! The type language of field and method signatures.

use serde::{Deserialize, Serialize};

/// A type as it appears in the dynamic core's field and method
/// signatures.
///
/// `raw()` produces the *raw type description*: the spelling the
/// sanitizer starts from. Types defined in the generated crate carry the
/// `pool::` prefix there (stripped during sanitization); external types
/// are spelled through the last segment of their defining namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Bool,
    I32,
    I64,
    U32,
    U64,
    F64,
    /// `Vec<inner>`
    Vec(Box<FieldType>),
    /// `Option<inner>`
    Option(Box<FieldType>),
    /// `HashMap<key, value>`
    Map {
        key: Box<FieldType>,
        value: Box<FieldType>,
    },
    /// The dynamic core's generic record collection.
    RecordSet,
    /// A named type defined in an external namespace
    /// (e.g. `NaiveDate` in `chrono`). Named container types are
    /// `External` too — their own namespace is what a dependency on them
    /// records.
    External { name: String, namespace: String },
    /// A named type defined in the generated pool crate itself
    /// (e.g. a sibling entity's data holder).
    Pool(String),
}

impl FieldType {
    /// The raw type description, before sanitization.
    pub fn raw(&self) -> String {
        match self {
            FieldType::String => "String".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::I32 => "i32".to_string(),
            FieldType::I64 => "i64".to_string(),
            FieldType::U32 => "u32".to_string(),
            FieldType::U64 => "u64".to_string(),
            FieldType::F64 => "f64".to_string(),
            FieldType::Vec(inner) => format!("Vec<{}>", inner.raw()),
            FieldType::Option(inner) => format!("Option<{}>", inner.raw()),
            FieldType::Map { key, value } => {
                format!("HashMap<{}, {}>", key.raw(), value.raw())
            }
            FieldType::RecordSet => "models::RecordCollection".to_string(),
            FieldType::External { name, namespace } => {
                match namespace.rsplit("::").next() {
                    Some(last) if !last.is_empty() => format!("{}::{}", last, name),
                    _ => name.clone(),
                }
            }
            FieldType::Pool(name) => format!("pool::{}", name),
        }
    }

    /// Returns true if this is the generic record collection.
    pub fn is_record_set(&self) -> bool {
        matches!(self, FieldType::RecordSet)
    }

    /// The namespace a dependency on this type must import, if any.
    ///
    /// Anonymous containers unwrap to their element (maps to their
    /// value); only `External` types have a defining namespace of their
    /// own.
    pub fn dep_namespace(&self) -> Option<&str> {
        match self {
            FieldType::External { namespace, .. } => Some(namespace),
            FieldType::Vec(inner) | FieldType::Option(inner) => inner.dep_namespace(),
            FieldType::Map { value, .. } => value.dep_namespace(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_spelling() {
        assert_eq!(FieldType::String.raw(), "String");
        assert_eq!(FieldType::Vec(Box::new(FieldType::I64)).raw(), "Vec<i64>");
        assert_eq!(
            FieldType::Map {
                key: Box::new(FieldType::String),
                value: Box::new(FieldType::F64),
            }
            .raw(),
            "HashMap<String, f64>"
        );
        assert_eq!(
            FieldType::External {
                name: "NaiveDate".to_string(),
                namespace: "chrono".to_string(),
            }
            .raw(),
            "chrono::NaiveDate"
        );
        assert_eq!(
            FieldType::External {
                name: "Duration".to_string(),
                namespace: "std::time".to_string(),
            }
            .raw(),
            "time::Duration"
        );
        assert_eq!(FieldType::Pool("Tag".to_string()).raw(), "pool::Tag");
        // A record set nested in a container keeps the qualified
        // spelling; the top-level case is rewritten by the sanitizer
        // before raw() matters.
        assert_eq!(
            FieldType::Vec(Box::new(FieldType::RecordSet)).raw(),
            "Vec<models::RecordCollection>"
        );
    }

    #[test]
    fn dep_namespace_unwraps_anonymous_containers() {
        let partner = FieldType::External {
            name: "Partner".to_string(),
            namespace: "crate::partner".to_string(),
        };
        // Vec<Option<Partner>> depends on Partner's namespace, not on the
        // anonymous wrappers.
        let ty = FieldType::Vec(Box::new(FieldType::Option(Box::new(partner))));
        assert_eq!(ty.dep_namespace(), Some("crate::partner"));

        assert_eq!(FieldType::String.dep_namespace(), None);
        assert_eq!(FieldType::RecordSet.dep_namespace(), None);
        assert_eq!(FieldType::Pool("Tag".to_string()).dep_namespace(), None);
    }
}
