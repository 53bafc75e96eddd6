//! Renders one [`ModelData`] into one generated Rust source file.
//!
//! Emission is pure substitution over an explicit, ordered section list;
//! all extraction logic happened earlier. A descriptor that violates the
//! catalog invariant here is an extraction bug and asserts.

use crate::model_data::{CallConvention, FieldData, MethodData, ModelData, TypeData};

/// Render the full generated module for one entity.
pub(crate) fn render(data: &ModelData) -> String {
    // Internal invariant: every field type has exactly one catalog
    // entry. A miss here is an extraction bug, never a valid input.
    for field in &data.fields {
        let hits = data.types.iter().filter(|t| t.ty == field.ty).count();
        assert!(
            hits == 1,
            "type catalog has {} entries for `{}` (field `{}` of `{}`)",
            hits,
            field.ty,
            field.name,
            data.name
        );
    }

    let sections = [
        header(data),
        model_section(data),
        condition_section(data),
        condition_start_section(data),
        condition_fields_section(data),
        data_section(data),
        record_set_section(data),
    ];
    sections.concat()
}

fn header(data: &ModelData) -> String {
    let mut out = String::new();
    out.push_str("// Code generated by poolgen. DO NOT EDIT.\n");
    out.push_str("//\n");
    out.push_str(&format!(
        "// Typed wrappers for the `{}` entity.\n\n",
        data.name
    ));
    out.push_str("#![allow(clippy::all)]\n");
    out.push_str("#![allow(unused_imports)]\n\n");
    for dep in &data.deps {
        out.push_str(&format!("use {};\n", dep));
    }
    out.push_str("use std::collections::HashMap;\n");
    out
}

fn model_section(data: &ModelData) -> String {
    let name = &data.name;
    let mut out = String::new();

    out.push_str("\n// ------- MODEL ---------\n\n");
    out.push_str(&format!(
        "/// `{name}Model` is a strongly typed handle on the `{name}` entity,\n\
         /// used to create and search records and to start conditions. Get the\n\
         /// unique instance through [`{accessor}()`].\n",
        name = name,
        accessor = ident(name)
    ));
    out.push_str("#[derive(Clone, Copy)]\n");
    out.push_str(&format!("pub struct {}Model {{\n", name));
    out.push_str("    pub model: &'static models::Model,\n");
    out.push_str("}\n\n");

    out.push_str(&format!(
        "/// Returns the unique instance of `{}Model`.\n",
        name
    ));
    out.push_str(&format!("pub fn {}() -> {}Model {{\n", ident(name), name));
    out.push_str(&format!("    {}Model {{\n", name));
    out.push_str(&format!(
        "        model: models::registry().must_get(\"{}\"),\n",
        name
    ));
    out.push_str("    }\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl {}Model {{\n", name));
    out.push_str(&format!(
        "    /// Returns a new empty `{}Set` in the given environment.\n",
        name
    ));
    out.push_str(&format!(
        "    pub fn new_set(self, env: &models::Environment) -> {}Set {{\n",
        name
    ));
    out.push_str(&format!("        {}Set {{\n", name));
    out.push_str(&format!("            rc: env.pool(\"{}\"),\n", name));
    out.push_str("        }\n    }\n\n");

    out.push_str(&format!(
        "    /// Creates a new `{}` record and returns the created set.\n",
        name
    ));
    out.push_str(&format!(
        "    pub fn create(self, env: &models::Environment, data: &{name}Data) -> {name}Set {{\n",
        name = name
    ));
    out.push_str(&format!("        {}Set {{\n", name));
    out.push_str("            rc: self.model.create(env, data.to_field_map()),\n");
    out.push_str("        }\n    }\n\n");

    out.push_str("    /// Searches the database and returns the records found.\n");
    out.push_str(&format!(
        "    pub fn search(self, env: &models::Environment, cond: {name}Condition) -> {name}Set {{\n",
        name = name
    ));
    out.push_str(&format!("        {}Set {{\n", name));
    out.push_str("            rc: self.model.search(env, cond.cond),\n");
    out.push_str("        }\n    }\n");

    for field in &data.fields {
        if let Some(rel) = &field.rel_model {
            out.push_str(&render_filtered_on(name, field, rel, "self.model"));
        }
        out.push_str(&render_field_accessor(name, field, "self.model"));
    }

    out.push_str("}\n");
    out
}

/// Join-filter method, shared between the model handle and the
/// condition start.
fn render_filtered_on(name: &str, field: &FieldData, rel: &str, recv: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n    /// Adds a join on `{}` filtered by the given condition.\n",
        field.name
    ));
    out.push_str(&format!(
        "    pub fn {}_filtered_on(self, cond: {}Condition) -> {}Condition {{\n",
        ident(&field.name),
        rel,
        name
    ));
    out.push_str(&format!("        {}Condition {{\n", name));
    out.push_str(&format!(
        "            cond: {}.filtered_on(\"{}\", cond.cond),\n",
        recv, field.name
    ));
    out.push_str("        }\n    }\n");
    out
}

/// Field accessor returning the condition-field entry point, shared
/// between the model handle and the condition start.
fn render_field_accessor(name: &str, field: &FieldData, recv: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n    /// Starts a condition on the `{}` field.\n",
        field.name
    ));
    out.push_str(&format!(
        "    pub fn {}(self) -> {}{}ConditionField {{\n",
        ident(&field.name),
        name,
        field.san_ty
    ));
    out.push_str(&format!("        {}{}ConditionField {{\n", name, field.san_ty));
    out.push_str(&format!(
        "            field: {}.field(\"{}\"),\n",
        recv, field.name
    ));
    out.push_str("        }\n    }\n");
    out
}

fn condition_section(data: &ModelData) -> String {
    let name = &data.name;
    let mut out = String::new();

    out.push_str("\n// ------- CONDITION ---------\n\n");
    out.push_str(&format!(
        "/// A type safe WHERE clause on the `{}` entity.\n",
        name
    ));
    out.push_str("#[derive(Clone)]\n");
    out.push_str(&format!("pub struct {}Condition {{\n", name));
    out.push_str("    pub cond: models::Condition,\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl {}Condition {{\n", name));
    let mut first = true;
    for func in data.condition_funcs {
        let snake = to_snake_case(func);
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(&format!(
            "    /// Completes the condition with a simple `{func}` clause:\n\
             \x20   /// `c.{snake}().pred` means `c {func} pred`.\n",
            func = func,
            snake = snake
        ));
        out.push_str(&format!(
            "    pub fn {}(self) -> {}ConditionStart {{\n",
            snake, name
        ));
        out.push_str(&format!("        {}ConditionStart {{\n", name));
        out.push_str(&format!("            start: self.cond.{}(),\n", snake));
        out.push_str("        }\n    }\n\n");

        out.push_str(&format!(
            "    /// Completes the condition with the given condition as a\n\
             \x20   /// parenthesized `{}` sub-expression.\n",
            func
        ));
        out.push_str(&format!(
            "    pub fn {}_cond(self, cond: {}Condition) -> {}Condition {{\n",
            snake, name, name
        ));
        out.push_str(&format!("        {}Condition {{\n", name));
        out.push_str(&format!(
            "            cond: self.cond.{}_cond(cond.cond),\n",
            snake
        ));
        out.push_str("        }\n    }\n");
    }
    out.push_str("}\n");
    out
}

fn condition_start_section(data: &ModelData) -> String {
    let name = &data.name;
    let mut out = String::new();

    out.push_str("\n// ------- CONDITION START ---------\n\n");
    out.push_str(
        "/// A condition in progress: a logical combinator has been chosen\n\
         /// and a predicate on a field is expected next.\n",
    );
    out.push_str("#[derive(Clone)]\n");
    out.push_str(&format!("pub struct {}ConditionStart {{\n", name));
    out.push_str("    pub start: models::ConditionStart,\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl {}ConditionStart {{", name));
    for field in &data.fields {
        out.push_str(&render_field_accessor(name, field, "self.start"));
        if let Some(rel) = &field.rel_model {
            out.push_str(&render_filtered_on(name, field, rel, "self.start"));
        }
    }
    out.push_str("}\n");
    out
}

fn condition_fields_section(data: &ModelData) -> String {
    let mut out = String::new();
    out.push_str("\n// ------- CONDITION FIELDS ---------\n");
    for ty in &data.types {
        out.push_str(&render_condition_field(data, ty));
    }
    out
}

fn render_condition_field(data: &ModelData, ty: &TypeData) -> String {
    let name = &data.name;
    let cf = format!("{}{}ConditionField", name, ty.san_ty);
    let mut out = String::new();

    out.push_str(&format!(
        "\n/// A partial `{name}Condition`: a field of type `{ty}` has been\n\
         /// selected and an operator is expected.\n",
        name = name,
        ty = ty.ty
    ));
    out.push_str(&format!("pub struct {} {{\n", cf));
    out.push_str("    pub field: models::ConditionField,\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl {} {{\n", cf));
    let mut first = true;
    for op in ty.operators {
        let snake = op_ident(op.name);
        let arg_ty = if op.multi && !ty.ty_is_rs {
            format!("Vec<{}>", ty.ty)
        } else {
            ty.ty.clone()
        };
        let forward = if ty.ty_is_rs { "arg.rc" } else { "arg" };

        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(&format!(
            "    /// Completes the condition with `{}` on the given value.\n",
            op.name
        ));
        out.push_str(&format!(
            "    pub fn {}(self, arg: {}) -> {}Condition {{\n",
            snake, arg_ty, name
        ));
        out.push_str(&format!("        {}Condition {{\n", name));
        out.push_str(&format!(
            "            cond: self.field.{}({}),\n",
            snake, forward
        ));
        out.push_str("        }\n    }\n\n");

        out.push_str(&format!(
            "    /// Deferred form of `{snake}`: the argument is computed from the\n\
             \x20   /// queried record set when the query runs.\n",
            snake = snake
        ));
        out.push_str(&format!(
            "    pub fn {}_func(\n        self,\n        arg: impl Fn({}Set) -> {} + 'static,\n    ) -> {}Condition {{\n",
            snake, name, arg_ty, name
        ));
        out.push_str(&format!("        {}Condition {{\n", name));
        let capture = if ty.ty_is_rs {
            format!("arg({}Set {{ rc }}).rc.into()", name)
        } else {
            format!("arg({}Set {{ rc }}).into()", name)
        };
        out.push_str(&format!(
            "            cond: self.field.{}_func(move |rc| {}),\n",
            snake, capture
        ));
        out.push_str("        }\n    }\n");
    }
    out.push_str("}\n");
    out
}

fn data_section(data: &ModelData) -> String {
    let name = &data.name;
    let mut out = String::new();

    out.push_str("\n// ------- DATA ---------\n\n");
    out.push_str(&format!(
        "/// A holder for `{}` data, used for bulk reads and bulk creates.\n",
        name
    ));
    out.push_str("#[derive(Clone, Default)]\n");
    out.push_str(&format!("pub struct {}Data {{\n", name));
    for field in &data.fields {
        out.push_str(&format!("    pub {}: {},\n", ident(&field.name), field.ty));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("impl {}Data {{\n", name));
    out.push_str("    /// Converts this holder into a field map for the dynamic core.\n");
    out.push_str("    pub fn to_field_map(&self) -> models::FieldMap {\n");
    out.push_str("        let mut fm = models::FieldMap::new();\n");
    for field in &data.fields {
        let value = if field.ty_is_rs {
            format!("self.{}.rc.clone()", ident(&field.name))
        } else {
            format!("self.{}.clone()", ident(&field.name))
        };
        out.push_str(&format!("        fm.set(\"{}\", {});\n", field.name, value));
    }
    out.push_str("        fm\n    }\n}\n");
    out
}

fn record_set_section(data: &ModelData) -> String {
    let name = &data.name;
    let mut out = String::new();

    out.push_str("\n// ------- RECORD SET ---------\n\n");
    out.push_str(&format!(
        "/// An autogenerated type to handle `{}` records.\n",
        name
    ));
    out.push_str("#[derive(Clone, Default)]\n");
    out.push_str(&format!("pub struct {}Set {{\n", name));
    out.push_str("    pub rc: models::RecordCollection,\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl models::RecordSet for {}Set {{\n", name));
    out.push_str("    fn collection(&self) -> &models::RecordCollection {\n");
    out.push_str("        &self.rc\n    }\n}\n\n");

    out.push_str(&format!("impl {}Set {{\n", name));

    out.push_str(
        "    /// Returns the data of the first record of the set, or zero\n\
         \x20   /// values if the set is empty.\n",
    );
    out.push_str(&format!("    pub fn first(&self) -> {}Data {{\n", name));
    out.push_str(&format!("        {}Data {{\n", name));
    for field in &data.fields {
        out.push_str(&format!(
            "            {id}: self.{id}(),\n",
            id = ident(&field.name)
        ));
    }
    out.push_str("        }\n    }\n\n");

    out.push_str("    /// Returns the data of every record of the set.\n");
    out.push_str(&format!("    pub fn all(&self) -> Vec<{}Data> {{\n", name));
    out.push_str(&format!(
        "        self.records().iter().map({}Set::first).collect()\n",
        name
    ));
    out.push_str("    }\n\n");

    out.push_str("    /// Returns all records of the set as singleton sets.\n");
    out.push_str(&format!("    pub fn records(&self) -> Vec<{}Set> {{\n", name));
    out.push_str("        self.rc\n");
    out.push_str("            .records()\n");
    out.push_str("            .into_iter()\n");
    out.push_str(&format!("            .map(|rc| {}Set {{ rc }})\n", name));
    out.push_str("            .collect()\n");
    out.push_str("    }\n\n");

    out.push_str(
        "    /// Inserts a record built from the given data and returns the\n\
         \x20   /// created set.\n",
    );
    out.push_str(&format!(
        "    pub fn create(&self, data: &{name}Data) -> {name}Set {{\n",
        name = name
    ));
    out.push_str(&format!("        {}Set {{\n", name));
    out.push_str("            rc: self\n");
    out.push_str("                .rc\n");
    out.push_str("                .call(\"Create\", vec![data.to_field_map().into()])\n");
    out.push_str("                .typed::<models::RecordCollection>(),\n");
    out.push_str("        }\n    }\n\n");

    out.push_str("    /// Filters the set with the additional given condition.\n");
    out.push_str(&format!(
        "    pub fn search(&self, cond: {name}Condition) -> {name}Set {{\n",
        name = name
    ));
    out.push_str(&format!("        {}Set {{\n", name));
    out.push_str("            rc: self.rc.search(cond.cond),\n");
    out.push_str("        }\n    }\n\n");

    out.push_str("    /// Returns the model handle of this set.\n");
    out.push_str(&format!("    pub fn model(&self) -> {}Model {{\n", name));
    out.push_str(&format!("        {}Model {{\n", name));
    out.push_str("            model: self.rc.model(),\n");
    out.push_str("        }\n    }\n\n");

    out.push_str(
        "    /// Returns a set with a modified call stack, so that calling the\n\
         \x20   /// current method on it executes the next method layer.\n",
    );
    out.push_str(&format!("    pub fn super_(&self) -> {}Set {{\n", name));
    out.push_str(&format!("        {}Set {{\n", name));
    out.push_str("            rc: self.rc.super_(),\n");
    out.push_str("        }\n    }\n");

    for field in &data.fields {
        out.push_str(&render_getter_setter(name, field));
    }
    for method in &data.methods {
        out.push_str(&render_method(name, method));
    }

    out.push_str("}\n");
    out
}

fn render_getter_setter(name: &str, field: &FieldData) -> String {
    let id = ident(&field.name);
    let mut out = String::new();

    out.push_str(&format!(
        "\n    /// Value of the `{}` field of the first record of the set.\n\
         \x20   /// Returns the zero value if the set is empty.\n",
        field.name
    ));
    out.push_str(&format!("    pub fn {}(&self) -> {} {{\n", id, field.ty));
    if field.ty_is_rs {
        out.push_str(&format!("        {} {{\n", field.ty));
        out.push_str(&format!(
            "            rc: self.rc.get(\"{}\").typed::<models::RecordCollection>(),\n",
            field.name
        ));
        out.push_str("        }\n");
    } else {
        out.push_str(&format!(
            "        self.rc.get(\"{}\").typed::<{}>()\n",
            field.name, field.ty
        ));
    }
    out.push_str("    }\n\n");

    out.push_str(&format!(
        "    /// Updates the `{}` field of every record of the set.\n",
        field.name
    ));
    out.push_str(&format!(
        "    pub fn set_{}(&self, value: {}) {{\n",
        id, field.ty
    ));
    let value = if field.ty_is_rs { "value.rc" } else { "value" };
    out.push_str(&format!(
        "        self.rc.set(\"{}\", {});\n",
        field.name, value
    ));
    out.push_str("    }\n");
    out
}

fn render_method(name: &str, method: &MethodData) -> String {
    let mut out = String::new();
    out.push('\n');
    if let Some(doc) = &method.doc {
        for line in doc.lines() {
            out.push_str(&format!("    /// {}\n", line));
        }
    }

    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| {
            let ty = if p.variadic {
                format!("Vec<{}>", p.ty)
            } else {
                p.ty.clone()
            };
            format!("{}: {}", ident(&p.name), ty)
        })
        .collect();
    let args: Vec<String> = method
        .params
        .iter()
        .map(|p| {
            if p.is_rs {
                format!("{}.rc.into()", ident(&p.name))
            } else {
                format!("{}.into()", ident(&p.name))
            }
        })
        .collect();
    let ret = match method.convention {
        CallConvention::Discard => String::new(),
        CallConvention::Single => format!(" -> {}", method.returns[0].ty),
        CallConvention::Multi => {
            let tys: Vec<&str> = method.returns.iter().map(|r| r.ty.as_str()).collect();
            format!(" -> ({})", tys.join(", "))
        }
    };

    out.push_str(&format!(
        "    pub fn {}(&self{}{}){} {{\n",
        ident(&method.name),
        if params.is_empty() { "" } else { ", " },
        params.join(", "),
        ret
    ));

    let call_args = format!("\"{}\", vec![{}]", method.name, args.join(", "));
    match method.convention {
        CallConvention::Discard => {
            out.push_str(&format!("        self.rc.call({});\n", call_args));
        }
        CallConvention::Single => {
            out.push_str(&format!("        let res = self.rc.call({});\n", call_args));
            let ret = &method.returns[0];
            if ret.is_rs {
                out.push_str(&format!("        {} {{\n", ret.ty));
                out.push_str("            rc: res.typed::<models::RecordCollection>(),\n");
                out.push_str("        }\n");
            } else {
                out.push_str(&format!("        res.typed::<{}>()\n", ret.ty));
            }
        }
        CallConvention::Multi => {
            out.push_str(&format!(
                "        let res = self.rc.call_multi({});\n",
                call_args
            ));
            out.push_str("        (\n");
            for (i, ret) in method.returns.iter().enumerate() {
                if ret.is_rs {
                    out.push_str(&format!("            {} {{\n", ret.ty));
                    out.push_str(&format!(
                        "                rc: res[{}].clone().typed::<models::RecordCollection>(),\n",
                        i
                    ));
                    out.push_str("            },\n");
                } else {
                    out.push_str(&format!(
                        "            res[{}].clone().typed::<{}>(),\n",
                        i, ret.ty
                    ));
                }
            }
            out.push_str("        )\n");
        }
    }
    out.push_str("    }\n");
    out
}

/// CamelCase → snake_case.
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Snake-cased identifier, escaped when it collides with a Rust
/// reserved word (`Super` → `super_`).
fn ident(name: &str) -> String {
    const KEYWORDS: [&str; 38] = [
        "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else",
        "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while",
    ];
    let snake = to_snake_case(name);
    if KEYWORDS.contains(&snake.as_str()) {
        format!("{}_", snake)
    } else {
        snake
    }
}

/// Operator method identifier. `In`/`NotIn` would snake-case onto a
/// reserved word and an awkward negation, so they get the conventional
/// `is_in`/`is_not_in` spellings.
fn op_ident(op: &str) -> String {
    match op {
        "In" => "is_in".to_string(),
        "NotIn" => "is_not_in".to_string(),
        "ILike" => "ilike".to_string(),
        "NotILike" => "not_ilike".to_string(),
        "ILikePattern" => "ilike_pattern".to_string(),
        other => to_snake_case(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case() {
        assert_eq!(to_snake_case("Partner"), "partner");
        assert_eq!(to_snake_case("GreaterOrEqual"), "greater_or_equal");
        assert_eq!(to_snake_case("AndNot"), "and_not");
    }

    #[test]
    fn idents_escape_reserved_words() {
        assert_eq!(ident("Name"), "name");
        assert_eq!(ident("Super"), "super_");
        assert_eq!(ident("Type"), "type_");
        assert_eq!(ident("Move"), "move_");
    }

    #[test]
    fn operator_idents() {
        assert_eq!(op_ident("Equals"), "equals");
        assert_eq!(op_ident("In"), "is_in");
        assert_eq!(op_ident("NotIn"), "is_not_in");
        assert_eq!(op_ident("ILikePattern"), "ilike_pattern");
        assert_eq!(op_ident("ChildOf"), "child_of");
    }
}
