use thiserror::Error;

/// Errors raised while extracting one entity's descriptor.
///
/// These are build-time failures and always fatal for the entity being
/// processed; they never abort the other entities of the batch.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// No parameter-name metadata after exhausting all resolution tiers.
    /// Emitting a malformed signature would be worse than failing the
    /// build, so this is a hard error.
    #[error("no parameter metadata for method `{method}` on entity `{entity}`")]
    UnresolvedParams { entity: String, method: String },

    /// The metadata row exists but its parameter names do not match the
    /// signature's arity.
    #[error(
        "parameter count mismatch for `{entity}.{method}`: signature has {expected}, metadata has {found}"
    )]
    ParamCountMismatch {
        entity: String,
        method: String,
        expected: usize,
        found: usize,
    },

    /// Generation was requested for an entity the registry does not
    /// contain.
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    /// A generated file could not be written out.
    #[error("cannot write `{path}`")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
