//! Type-name sanitization and identifier synthesis.
//!
//! Two pure, total functions: raw type description → semantic type name,
//! and semantic type name → identifier-safe token. Neither can fail.

use poolgen_ir::FieldType;

/// Namespace prefix of types defined in the generated crate itself.
/// Stripped during sanitization — inside the pool crate those names are
/// bare.
pub const POOL_NS: &str = "pool::";

/// Maps a raw signature type to its semantic name and a flag telling
/// whether it denotes a record set (a relation to some entity).
///
/// The generic record collection becomes the *current* entity's set
/// type; everything else keeps its raw spelling minus the generation
/// namespace prefix.
pub fn sanitized_field_type(entity: &str, ty: &FieldType) -> (String, bool) {
    if ty.is_record_set() {
        return (format!("{}Set", entity), true);
    }
    (ty.raw().replacen(POOL_NS, "", 1), false)
}

/// Derives an identifier-safe token from a semantic type name.
///
/// Container syntax becomes a word marker (`Vec<` → `Slice`,
/// `HashMap<` → `Map`, `Option<` → `Opt`), all remaining punctuation is
/// dropped, and each alphanumeric run is title-cased.
pub fn type_ident(ty: &str) -> String {
    // The trailing space puts a run boundary between the marker and a
    // lowercase-starting element, so `i64` still title-cases.
    let marked = ty
        .replace("Vec<", "Slice ")
        .replace("HashMap<", "Map ")
        .replace("Option<", "Opt ");

    let mut out = String::with_capacity(marked.len());
    let mut boundary = true;
    for ch in marked.chars() {
        if ch.is_alphanumeric() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            boundary = false;
        } else {
            boundary = true;
        }
    }
    out
}
