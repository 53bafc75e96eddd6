//! Generation-ready descriptors and their assembly.
//!
//! One [`ModelData`] per entity, built fresh from the finalized registry
//! and discarded after emission. Everything the emitter needs is in
//! here; emission itself is pure substitution.

use poolgen_ir::{AstIndex, EntityDef, Registry};

use crate::catalog;
use crate::deps::DepTracker;
use crate::error::CodegenError;
use crate::field;
use crate::method;

/// The four logical combinators every condition type exposes.
pub const CONDITION_FUNCS: [&str; 4] = ["And", "AndNot", "Or", "OrNot"];

/// A field of the record set, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldData {
    /// Field name as declared (e.g. `Name`).
    pub name: String,
    /// Target entity name, for relation fields.
    pub rel_model: Option<String>,
    /// Whether the field can appear in filters.
    pub searchable: bool,
    /// Semantic type name (e.g. `String`, `PartnerSet`).
    pub ty: String,
    /// Identifier-safe token derived from `ty`.
    pub san_ty: String,
    /// Whether `ty` denotes a record set.
    pub ty_is_rs: bool,
}

/// One condition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDef {
    pub name: &'static str,
    /// Multi-valued operators take a list of scalars — or an entity set
    /// for relation types.
    pub multi: bool,
}

/// A distinct field type of the entity, with its operator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeData {
    pub ty: String,
    pub san_ty: String,
    pub ty_is_rs: bool,
    pub operators: &'static [OperatorDef],
}

/// A wrapper-method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamData {
    pub name: String,
    /// Semantic type of the wrapper parameter.
    pub ty: String,
    /// Relation parameters keep the typed set name in the signature but
    /// forward the underlying collection.
    pub is_rs: bool,
    /// Variable-length tail parameter, forwarded as one collection
    /// value.
    pub variadic: bool,
}

/// One component of a wrapper-method return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnData {
    pub ty: String,
    pub is_rs: bool,
}

/// How the wrapper forwards into the dynamic dispatch mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    /// No declared returns; the call result is discarded.
    Discard,
    /// One return, re-asserted to its semantic type.
    Single,
    /// Several returns, each component independently re-asserted.
    Multi,
}

/// A forwarding wrapper for one declared method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodData {
    pub name: String,
    pub doc: Option<String>,
    pub params: Vec<ParamData>,
    pub convention: CallConvention,
    pub returns: Vec<ReturnData>,
}

/// The complete per-entity descriptor handed to the emitter.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub name: String,
    /// External namespaces the generated file imports, first-mention
    /// order.
    pub deps: Vec<String>,
    pub fields: Vec<FieldData>,
    pub methods: Vec<MethodData>,
    pub condition_funcs: [&'static str; 4],
    /// Deduplicated field types, first-occurrence order.
    pub types: Vec<TypeData>,
}

impl ModelData {
    /// Assemble the descriptor for one entity of a finalized registry.
    pub fn build(
        entity: &EntityDef,
        registry: &Registry,
        ast: &AstIndex,
    ) -> Result<Self, CodegenError> {
        let mut deps = DepTracker::new();

        let fields = field::extract(entity, &mut deps);
        let types = catalog::build(&fields);
        let methods = method::extract(entity, registry, ast, &mut deps)?;

        Ok(Self {
            name: entity.name.clone(),
            deps: deps.into_deps(),
            fields,
            methods,
            condition_funcs: CONDITION_FUNCS,
            types,
        })
    }
}
