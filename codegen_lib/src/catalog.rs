//! Per-entity operator catalog.

use crate::model_data::{FieldData, OperatorDef, TypeData};

/// The fixed operator set attached to every field type. `In`/`NotIn`
/// are multi-valued: they take a list of scalars, or an entity set for
/// relation types. Every operator also gets a deferred form at emission
/// time.
pub const OPERATORS: [OperatorDef; 15] = [
    OperatorDef { name: "Equals", multi: false },
    OperatorDef { name: "NotEquals", multi: false },
    OperatorDef { name: "Greater", multi: false },
    OperatorDef { name: "GreaterOrEqual", multi: false },
    OperatorDef { name: "Lower", multi: false },
    OperatorDef { name: "LowerOrEqual", multi: false },
    OperatorDef { name: "LikePattern", multi: false },
    OperatorDef { name: "Like", multi: false },
    OperatorDef { name: "NotLike", multi: false },
    OperatorDef { name: "ILike", multi: false },
    OperatorDef { name: "NotILike", multi: false },
    OperatorDef { name: "ILikePattern", multi: false },
    OperatorDef { name: "In", multi: true },
    OperatorDef { name: "NotIn", multi: true },
    OperatorDef { name: "ChildOf", multi: false },
];

/// Deduplicate the entity's field types, keeping the first occurrence of
/// each distinct semantic type, and attach the operator set.
pub(crate) fn build(fields: &[FieldData]) -> Vec<TypeData> {
    let mut types: Vec<TypeData> = Vec::new();

    for field in fields {
        if types.iter().any(|t| t.ty == field.ty) {
            continue;
        }
        types.push(TypeData {
            ty: field.ty.clone(),
            san_ty: field.san_ty.clone(),
            ty_is_rs: field.ty_is_rs,
            operators: &OPERATORS,
        });
    }

    types
}
