//! Collection renderer
//!
//! Emits a Go struct for a list of variables. Variables with embedded
//! fields get their own named struct, emitted before the struct that
//! references them.

use crate::templates::render;
use crate::type_mapper::go_type;
use serde::Serialize;
use tera::{Context, Tera};
use wadlgen_common::naming::{case_first_char, render_identifier};
use wadlgen_common::{Diagnostics, RequestType, Result, Variable};

/// Template view of one struct field
#[derive(Debug, Serialize)]
struct FieldView<'a> {
    name: &'a str,
    go_type: String,
    json_tag: String,
    required: bool,
    documentation: &'a str,
}

/// Render the struct for `variables` and every nested struct it needs
///
/// `stem` is the casing-normalized method name; `type_name` derives the
/// struct name from a stem (`params_type_name` or `results_type_name`).
/// Nested structs are named from the stem plus the field name, so a
/// `server` object on `createServer` params becomes
/// `CreateServerServerParams`.
pub fn render_collection(
    tera: &Tera,
    out: &mut String,
    stem: &str,
    variables: &[Variable],
    type_name: fn(&str) -> String,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let mut fields = Vec::with_capacity(variables.len());

    for variable in variables {
        let field_type = if variable.is_nested() {
            let nested_stem = render_identifier(
                &format!("{}{}", stem, case_first_char(&variable.name, true)),
                true,
            );
            render_collection(
                tera,
                out,
                &nested_stem,
                &variable.embedded,
                type_name,
                diagnostics,
            )?;
            type_name(&nested_stem)
        } else {
            go_type(&variable.var_type, diagnostics)
        };

        fields.push(FieldView {
            name: &variable.name,
            go_type: field_type,
            json_tag: json_tag(variable),
            required: variable.required,
            documentation: &variable.documentation,
        });
    }

    let mut context = Context::new();
    context.insert("name", &type_name(stem));
    context.insert("fields", &fields);
    out.push_str(&render(tera, "collection.go", &context)?);

    Ok(())
}

/// JSON struct tag for a field
///
/// Only body (`plain`) fields are serialized; optional ones are omitted
/// when empty. Everything else is carried on the type but tagged `-`.
pub fn json_tag(variable: &Variable) -> String {
    match variable.request_type {
        RequestType::Plain if variable.required => variable.name.clone(),
        RequestType::Plain => format!("{},omitempty", variable.name),
        _ => "-".to_string(),
    }
}
