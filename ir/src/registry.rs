//! The registry snapshot and its one-shot finalization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{EntityDef, FieldDef, MethodDef};

/// Errors raised while finalizing a snapshot.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("entity `{entity}` applies unknown mixin `{mixin}`")]
    UnknownMixin { entity: String, mixin: String },

    #[error("entity `{entity}` embeds unknown entity `{embed}`")]
    UnknownEmbed { entity: String, embed: String },

    #[error("mixin cycle through `{0}`")]
    MixinCycle(String),
}

/// The full entity registry, exported by the dynamic core once
/// bootstrapped.
///
/// Extraction must only ever see a *finalized* registry: one where every
/// entity's field and method maps already include everything contributed
/// by mixins and embedded entities. [`Registry::finalize`] establishes
/// that shape and must be called exactly once before generation; calling
/// it again is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// All entities, keyed by name. Mixins are entities too.
    pub entities: BTreeMap<String, EntityDef>,

    /// Mixins implicitly applied to every entity, in application order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_mixins: Vec<String>,
}

impl Registry {
    /// Get an entity by name.
    pub fn get(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Register an entity, replacing any previous definition of the
    /// same name.
    pub fn insert(&mut self, entity: EntityDef) {
        self.entities.insert(entity.name.clone(), entity);
    }

    /// All entity names, in name order.
    pub fn entity_names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    /// Merge mixin- and embed-contributed members into every entity.
    ///
    /// Precedence: an entity's own members win over mixins; a
    /// later-applied mixin wins over an earlier one; embeds contribute
    /// only fields, and only where no field of that name exists yet.
    pub fn finalize(&mut self) -> Result<(), SchemaError> {
        let snapshot = self.entities.clone();

        for (name, entity) in &mut self.entities {
            let mut stack = Vec::new();
            let (mut fields, mut methods) =
                resolve_members(&snapshot, name, &self.common_mixins, &mut stack)?;

            // The entity's own declarations take precedence.
            fields.append(&mut std::mem::take(&mut entity.fields));
            methods.append(&mut std::mem::take(&mut entity.methods));

            // Embedded entities contribute missing fields only.
            for embed in &entity.embeds {
                let Some(target) = snapshot.get(embed) else {
                    return Err(SchemaError::UnknownEmbed {
                        entity: name.clone(),
                        embed: embed.clone(),
                    });
                };
                for (fname, fdef) in &target.fields {
                    fields
                        .entry(fname.clone())
                        .or_insert_with(|| fdef.clone());
                }
            }

            entity.fields = fields;
            entity.methods = methods;
        }

        Ok(())
    }
}

/// Members contributed to `name` by its mixin chain (recursively),
/// without `name`'s own declarations. `extra` is the common-mixin list,
/// applied before the entity's own mixins at the top level only.
fn resolve_members(
    snapshot: &BTreeMap<String, EntityDef>,
    name: &str,
    extra: &[String],
    stack: &mut Vec<String>,
) -> Result<(BTreeMap<String, FieldDef>, BTreeMap<String, MethodDef>), SchemaError> {
    if stack.iter().any(|n| n == name) {
        return Err(SchemaError::MixinCycle(name.to_string()));
    }
    stack.push(name.to_string());

    let entity = &snapshot[name];
    let mut fields = BTreeMap::new();
    let mut methods = BTreeMap::new();

    for mixin in extra.iter().chain(entity.mixins.iter()) {
        // A common mixin does not apply to itself.
        if mixin == name {
            continue;
        }
        if !snapshot.contains_key(mixin.as_str()) {
            return Err(SchemaError::UnknownMixin {
                entity: name.to_string(),
                mixin: mixin.clone(),
            });
        }
        let (mixin_fields, mixin_methods) = resolve_members(snapshot, mixin, &[], stack)?;

        // Later-applied mixins override earlier ones.
        fields.extend(mixin_fields);
        methods.extend(mixin_methods);
        fields.extend(
            snapshot[mixin.as_str()]
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        methods.extend(
            snapshot[mixin.as_str()]
                .methods
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    stack.pop();
    Ok((fields, methods))
}
