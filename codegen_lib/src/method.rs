//! Method extraction: signatures → call-forwarding descriptors.
//!
//! The dominant piece of the pipeline: tiered parameter-name resolution
//! against the static-analysis table, variadic and multi-return
//! handling, and dependency computation alongside.

use poolgen_ir::{AstIndex, EntityDef, MethodAstData, MethodRef, Registry};

use crate::deps::DepTracker;
use crate::error::CodegenError;
use crate::model_data::{CallConvention, MethodData, ParamData, ReturnData};
use crate::sanitize::sanitized_field_type;

/// Methods with bespoke, hand-written wrappers. Never generated.
pub const SPECIFIC_METHODS: [&str; 4] = ["All", "Create", "First", "Search"];

/// Produce one forwarding descriptor per declared method, in name order.
pub(crate) fn extract(
    entity: &EntityDef,
    registry: &Registry,
    ast: &AstIndex,
    deps: &mut DepTracker,
) -> Result<Vec<MethodData>, CodegenError> {
    let mut methods = Vec::new();

    for (name, def) in &entity.methods {
        if SPECIFIC_METHODS.contains(&name.as_str()) {
            continue;
        }

        let meta = resolve_ast(entity, registry, ast, name).ok_or_else(|| {
            CodegenError::UnresolvedParams {
                entity: entity.name.clone(),
                method: name.clone(),
            }
        })?;
        if meta.params.len() != def.params.len() {
            return Err(CodegenError::ParamCountMismatch {
                entity: entity.name.clone(),
                method: name.clone(),
                expected: def.params.len(),
                found: meta.params.len(),
            });
        }

        let last = def.params.len().checked_sub(1);
        let mut params = Vec::with_capacity(def.params.len());
        for (i, ty) in def.params.iter().enumerate() {
            let (sem, is_rs) = sanitized_field_type(&entity.name, ty);
            deps.add(ty);
            params.push(ParamData {
                name: meta.params[i].clone(),
                ty: sem,
                is_rs,
                variadic: def.variadic && Some(i) == last,
            });
        }

        let mut returns = Vec::with_capacity(def.returns.len());
        for ty in &def.returns {
            let (sem, is_rs) = sanitized_field_type(&entity.name, ty);
            deps.add(ty);
            returns.push(ReturnData { ty: sem, is_rs });
        }

        let convention = match returns.len() {
            0 => CallConvention::Discard,
            1 => CallConvention::Single,
            _ => CallConvention::Multi,
        };

        methods.push(MethodData {
            name: name.clone(),
            doc: def.doc.clone().or_else(|| meta.doc.clone()),
            params,
            convention,
            returns,
        });
    }

    Ok(methods)
}

/// Tiered lookup, first match wins:
/// 1. exact (entity, method);
/// 2. each mixin applied to the entity, most-recently-applied first
///    (the entity's own mixins are applied after the common ones);
/// 3. the entity-less default entry.
fn resolve_ast<'a>(
    entity: &EntityDef,
    registry: &Registry,
    ast: &'a AstIndex,
    method: &str,
) -> Option<&'a MethodAstData> {
    if let Some(meta) = ast.get(&MethodRef::new(entity.name.clone(), method)) {
        return Some(meta);
    }

    let applied: Vec<&String> = registry
        .common_mixins
        .iter()
        .chain(entity.mixins.iter())
        .collect();
    for mixin in applied.iter().rev() {
        if let Some(meta) = ast.get(&MethodRef::new((*mixin).clone(), method)) {
            return Some(meta);
        }
    }

    ast.get(&MethodRef::new("", method))
}
