//! Field extraction.

use poolgen_ir::EntityDef;

use crate::deps::DepTracker;
use crate::model_data::FieldData;
use crate::sanitize::{sanitized_field_type, type_ident};

/// Convert an entity's finalized field map into generation-ready
/// descriptors, in field-name order.
///
/// Relation fields always get the target entity's set type and are
/// always searchable; scalar fields are searchable when stored or when
/// computed from a related field.
pub(crate) fn extract(entity: &EntityDef, deps: &mut DepTracker) -> Vec<FieldData> {
    let mut fields = Vec::with_capacity(entity.fields.len());

    for (name, def) in &entity.fields {
        let (ty, ty_is_rs, rel_model, searchable) = match &def.relation {
            Some(target) => (format!("{}Set", target), true, Some(target.clone()), true),
            None => {
                let (ty, is_rs) = sanitized_field_type(&entity.name, &def.ty);
                (ty, is_rs, None, def.stored || def.related)
            }
        };

        deps.add(&def.ty);
        fields.push(FieldData {
            name: name.clone(),
            rel_model,
            searchable,
            san_ty: type_ident(&ty),
            ty,
            ty_is_rs,
        });
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolgen_ir::{FieldDef, FieldType};

    fn entity() -> EntityDef {
        let mut partner = EntityDef::new("Partner");
        partner.fields.insert(
            "Name".to_string(),
            FieldDef {
                ty: FieldType::String,
                relation: None,
                stored: true,
                related: false,
            },
        );
        partner.fields.insert(
            "Manager".to_string(),
            FieldDef {
                ty: FieldType::RecordSet,
                relation: Some("Partner".to_string()),
                stored: true,
                related: false,
            },
        );
        partner.fields.insert(
            "Score".to_string(),
            FieldDef {
                ty: FieldType::F64,
                relation: None,
                stored: false,
                related: false,
            },
        );
        partner
    }

    #[test]
    fn relation_fields_use_the_target_set_type() {
        let mut deps = DepTracker::new();
        let fields = extract(&entity(), &mut deps);

        let manager = fields.iter().find(|f| f.name == "Manager").unwrap();
        assert_eq!(manager.ty, "PartnerSet");
        assert!(manager.ty_is_rs);
        assert_eq!(manager.rel_model.as_deref(), Some("Partner"));
        assert!(manager.searchable);
    }

    #[test]
    fn unstored_computed_fields_are_not_searchable() {
        let mut deps = DepTracker::new();
        let fields = extract(&entity(), &mut deps);

        let score = fields.iter().find(|f| f.name == "Score").unwrap();
        assert!(!score.searchable);
        let name = fields.iter().find(|f| f.name == "Name").unwrap();
        assert!(name.searchable);
    }

    #[test]
    fn extraction_order_is_field_name_order() {
        let mut deps = DepTracker::new();
        let names: Vec<_> = extract(&entity(), &mut deps)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Manager", "Name", "Score"]);
    }
}
