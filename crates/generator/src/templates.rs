//! Template loading and management

use crate::docs::render_documentation;
use std::collections::HashMap;
use tera::{Tera, Value};
use wadlgen_common::naming::render_identifier;
use wadlgen_common::{GeneratorError, Result};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    // Register custom filters
    tera.register_filter("identifier", identifier_filter);
    tera.register_filter("go_doc", go_doc_filter);

    tera.add_raw_template(
        "file_header.go",
        include_str!("../templates/file_header.go.tera"),
    )
    .map_err(|e| {
        GeneratorError::Generation(format!("Failed to load file_header.go template: {}", e))
    })?;

    tera.add_raw_template(
        "collection.go",
        include_str!("../templates/collection.go.tera"),
    )
    .map_err(|e| {
        GeneratorError::Generation(format!("Failed to load collection.go template: {}", e))
    })?;

    tera.add_raw_template("function.go", include_str!("../templates/function.go.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load function.go template: {}", e))
        })?;

    Ok(tera)
}

/// Render a template, mapping tera's error into ours
pub fn render(tera: &Tera, name: &str, context: &tera::Context) -> Result<String> {
    tera.render(name, context)
        .map_err(|e| GeneratorError::Generation(format!("Template error in {}: {:?}", name, e)))
}

/// Filter to render a raw name as a Go identifier
///
/// Exported by default; `identifier(exported=false)` lower-cases the first
/// character instead.
fn identifier_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("identifier filter expects a string"))?;
    let exported = args
        .get("exported")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    Ok(Value::String(render_identifier(name, exported)))
}

/// Filter to turn documentation into a Go comment block
fn go_doc_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let doc = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("go_doc filter expects a string"))?;

    Ok(Value::String(render_documentation(doc)))
}
