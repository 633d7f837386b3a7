//! Variable model builder
//!
//! Converts WADL params and JSON-schema property maps into the uniform
//! [`Variable`] tree.

use crate::wadl::{Doc, Param};
use serde_json::{Map, Value};
use wadlgen_common::{Diagnostics, RequestType, Variable};

/// Convert WADL params into variables, preserving order
pub fn params_to_variables(params: &[Param]) -> Vec<Variable> {
    params
        .iter()
        .map(|param| Variable {
            name: param.name.clone(),
            var_type: param.param_type.clone(),
            request_type: param.style,
            required: param.required,
            uri: None,
            documentation: docs_to_documentation(&param.docs),
            path: param.path.clone(),
            embedded: Vec::new(),
        })
        .collect()
}

/// Flatten documentation fragments into one block
///
/// Each fragment is trimmed and terminated with a newline, then the whole
/// block is trimmed again.
pub fn docs_to_documentation(docs: &[Doc]) -> String {
    let mut comment = String::new();
    for doc in docs {
        comment.push_str(doc.content.trim());
        comment.push('\n');
    }
    comment.trim().to_string()
}

/// Convert a JSON-schema node into variables, one per declared property
///
/// Property attributes are matched case-insensitively: `id` sets the URI,
/// `type` the type, `documentation` the documentation, and `properties`
/// recurses into embedded variables. Other attributes are ignored. Names
/// listed under `required` are flagged; a required name with no declared
/// property yields a warning and nothing else.
pub fn schema_to_variables(schema: &Map<String, Value>, diagnostics: &mut Diagnostics) -> Vec<Variable> {
    let mut variables = Vec::new();

    if let Some(Value::Object(properties)) = schema.get("properties") {
        for (name, attrs) in properties {
            let mut variable = Variable {
                name: name.clone(),
                request_type: RequestType::Plain,
                ..Variable::default()
            };

            let Value::Object(attrs) = attrs else {
                diagnostics.warn(format!(
                    "JSON schema property {name:?} is not an object; treating it as untyped"
                ));
                variables.push(variable);
                continue;
            };

            for (attr_name, attr) in attrs {
                match attr_name.to_lowercase().as_str() {
                    "id" => variable.uri = string_attr(name, attr_name, attr, diagnostics),
                    "type" => {
                        variable.var_type =
                            string_attr(name, attr_name, attr, diagnostics).unwrap_or_default()
                    }
                    "properties" => {
                        tracing::debug!("JSON schema: nested properties under {name}");
                        variable.embedded = schema_to_variables(attrs, diagnostics);
                    }
                    "documentation" => {
                        variable.documentation =
                            string_attr(name, attr_name, attr, diagnostics).unwrap_or_default()
                    }
                    _ => {}
                }
            }

            variables.push(variable);
        }
    }

    if let Some(Value::Array(required)) = schema.get("required") {
        for required_name in required {
            let required_name = required_name.as_str().unwrap_or_default();
            let mut found = false;
            for variable in variables.iter_mut().filter(|v| v.name == required_name) {
                variable.required = true;
                found = true;
            }
            if !found {
                diagnostics.warn(format!(
                    "Unknown variable ({required_name}) was declared as required"
                ));
            }
        }
    }

    tracing::debug!("JSON schema: {} variables", variables.len());
    variables
}

fn string_attr(
    property: &str,
    attr_name: &str,
    attr: &Value,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match attr {
        Value::String(s) => Some(s.clone()),
        other => {
            diagnostics.warn(format!(
                "JSON schema property {property:?}: ignoring non-string {attr_name} {other}"
            ));
            None
        }
    }
}
