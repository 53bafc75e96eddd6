/// Integration test for full pool generation

use poolgen_ir::{
    AstEntry, AstIndex, EntityDef, FieldDef, FieldType, MethodDef, Registry,
};
use poolgen_lib::PoolGenerator;

/// The fixed operator set, as generated method names.
const OPERATOR_IDENTS: [&str; 15] = [
    "equals",
    "not_equals",
    "greater",
    "greater_or_equal",
    "lower",
    "lower_or_equal",
    "like_pattern",
    "like",
    "not_like",
    "ilike",
    "not_ilike",
    "ilike_pattern",
    "is_in",
    "is_not_in",
    "child_of",
];

fn partner_registry() -> Registry {
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

    partner.methods.insert(
        "Greeting".to_string(),
        MethodDef {
            doc: Some("Greeting returns a greeting for the record.".to_string()),
            params: vec![],
            variadic: false,
            returns: vec![FieldType::String],
        },
    );
    partner.methods.insert(
        "Notify".to_string(),
        MethodDef {
            doc: None,
            params: vec![FieldType::Bool, FieldType::String],
            variadic: true,
            returns: vec![],
        },
    );
    partner.methods.insert(
        "Split".to_string(),
        MethodDef {
            doc: None,
            params: vec![FieldType::I64],
            variadic: false,
            returns: vec![FieldType::RecordSet, FieldType::I64],
        },
    );
    // Bespoke wrapper, must not get a generated forwarding method.
    partner.methods.insert(
        "Create".to_string(),
        MethodDef {
            doc: None,
            params: vec![],
            variadic: false,
            returns: vec![FieldType::RecordSet],
        },
    );

    let mut registry = Registry::default();
    registry.insert(partner);
    registry.finalize().unwrap();
    registry
}

fn partner_ast() -> AstIndex {
    AstIndex::from_entries(vec![
        AstEntry {
            entity: "Partner".to_string(),
            method: "Greeting".to_string(),
            params: vec![],
            doc: None,
        },
        AstEntry {
            entity: "Partner".to_string(),
            method: "Notify".to_string(),
            params: vec!["urgent".to_string(), "msgs".to_string()],
            doc: None,
        },
        AstEntry {
            entity: "Partner".to_string(),
            method: "Split".to_string(),
            params: vec!["count".to_string()],
            doc: None,
        },
    ])
}

fn generate_partner() -> String {
    let registry = partner_registry();
    let ast = partner_ast();
    let report = PoolGenerator::new(&registry, &ast).generate();
    assert!(report.is_success(), "failures: {:?}", report.failures);
    assert_eq!(report.code.files.len(), 1);
    assert_eq!(report.code.files[0].path, "partner.rs");
    report.code.files[0].content.clone()
}

#[test]
fn model_handle_section() {
    let content = generate_partner();

    assert!(content.contains("pub struct PartnerModel"));
    assert!(content.contains("pub fn partner() -> PartnerModel"));
    assert!(content.contains("models::registry().must_get(\"Partner\")"));
    assert!(content.contains(
        "pub fn create(self, env: &models::Environment, data: &PartnerData) -> PartnerSet"
    ));
    assert!(content.contains(
        "pub fn search(self, env: &models::Environment, cond: PartnerCondition) -> PartnerSet"
    ));
}

#[test]
fn join_filter_exists_on_model_handle_and_condition_start() {
    let content = generate_partner();

    let sig = "pub fn manager_filtered_on(self, cond: PartnerCondition) -> PartnerCondition";
    assert_eq!(content.matches(sig).count(), 2);
    // Only relation fields get a join filter.
    assert!(!content.contains("name_filtered_on"));
}

#[test]
fn condition_combinators() {
    let content = generate_partner();

    for comb in ["and", "and_not", "or", "or_not"] {
        assert!(
            content.contains(&format!("pub fn {}(self) -> PartnerConditionStart", comb)),
            "missing combinator `{}`",
            comb
        );
        assert!(
            content.contains(&format!(
                "pub fn {}_cond(self, cond: PartnerCondition) -> PartnerCondition",
                comb
            )),
            "missing subcondition combinator `{}_cond`",
            comb
        );
    }
}

#[test]
fn condition_fields_expose_all_operators_in_both_forms() {
    let content = generate_partner();

    // One condition-field type per distinct field type.
    assert!(content.contains("pub struct PartnerStringConditionField"));
    assert!(content.contains("pub struct PartnerPartnerSetConditionField"));

    for op in OPERATOR_IDENTS {
        assert!(
            content.contains(&format!("pub fn {}(self, arg:", op)),
            "missing immediate operator `{}`",
            op
        );
        assert!(
            content.contains(&format!("pub fn {}_func(", op)),
            "missing deferred operator `{}_func`",
            op
        );
    }

    // Multi-valued operators take a scalar list, or the entity set for
    // relation types.
    assert!(content.contains("pub fn is_in(self, arg: Vec<String>)"));
    assert!(content.contains("pub fn is_in(self, arg: PartnerSet)"));
}

#[test]
fn data_holder_and_field_map() {
    let content = generate_partner();

    assert!(content.contains("pub struct PartnerData"));
    assert!(content.contains("pub manager: PartnerSet,"));
    assert!(content.contains("pub name: String,"));
    assert!(content.contains("pub fn to_field_map(&self) -> models::FieldMap"));
    assert!(content.contains("fm.set(\"Manager\", self.manager.rc.clone());"));
    assert!(content.contains("fm.set(\"Name\", self.name.clone());"));
}

#[test]
fn record_set_getters_setters_and_builtins() {
    let content = generate_partner();

    assert!(content.contains("pub struct PartnerSet"));
    assert!(content.contains("impl models::RecordSet for PartnerSet"));
    assert!(content.contains("pub fn first(&self) -> PartnerData"));
    assert!(content.contains("pub fn all(&self) -> Vec<PartnerData>"));
    assert!(content.contains("pub fn records(&self) -> Vec<PartnerSet>"));
    assert!(content.contains("pub fn super_(&self) -> PartnerSet"));
    assert!(content.contains("pub fn model(&self) -> PartnerModel"));

    // Relation getter returns the related set type.
    assert!(content.contains("pub fn manager(&self) -> PartnerSet"));
    assert!(content.contains("pub fn set_manager(&self, value: PartnerSet)"));
    assert!(content.contains("pub fn name(&self) -> String"));
    assert!(content.contains("pub fn set_name(&self, value: String)"));
    assert!(content.contains("self.rc.get(\"Name\").typed::<String>()"));
}

#[test]
fn forwarding_conventions() {
    let content = generate_partner();

    // Single return, re-asserted to its semantic type, with the doc
    // text carried over.
    assert!(content.contains("/// Greeting returns a greeting for the record."));
    assert!(content.contains("pub fn greeting(&self) -> String"));
    assert!(content.contains("let res = self.rc.call(\"Greeting\", vec![]);"));
    assert!(content.contains("res.typed::<String>()"));

    // Variadic tail forwarded as one collection value, result discarded.
    assert!(content.contains("pub fn notify(&self, urgent: bool, msgs: Vec<String>)"));
    assert!(content.contains("self.rc.call(\"Notify\", vec![urgent.into(), msgs.into()]);"));

    // Multi return: each component independently asserted, relations
    // wrapped back into the set type.
    assert!(content.contains("pub fn split(&self, count: i64) -> (PartnerSet, i64)"));
    assert!(content.contains("let res = self.rc.call_multi(\"Split\", vec![count.into()]);"));
    assert!(content.contains("res[0].clone().typed::<models::RecordCollection>()"));
    assert!(content.contains("res[1].clone().typed::<i64>()"));

    // Bespoke methods keep their hand-written wrappers.
    assert!(!content.contains("self.rc.call(\"Create\""));
}

#[test]
fn header_and_imports() {
    let content = generate_partner();

    assert!(content.starts_with("// Code generated by poolgen. DO NOT EDIT."));
    assert!(content.contains("#![allow(clippy::all)]"));
    assert!(content.contains("use models;\n"));
    assert!(content.contains("use std::collections::HashMap;\n"));
}

#[test]
fn regeneration_is_byte_identical() {
    assert_eq!(generate_partner(), generate_partner());
}

#[test]
fn write_to_creates_one_file_per_entity() {
    let registry = partner_registry();
    let ast = partner_ast();
    let report = PoolGenerator::new(&registry, &ast).generate();
    assert!(report.is_success());

    let dir = tempfile::tempdir().unwrap();
    report.code.write_to(dir.path()).unwrap();

    let written = std::fs::read_to_string(dir.path().join("partner.rs")).unwrap();
    assert_eq!(written, report.code.files[0].content);
}
