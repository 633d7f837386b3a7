//! Grammar resolver
//!
//! Loads the JSON-schema files named in `<grammars>` and flattens them into
//! a pool of top-level variables that request representations can reference
//! by URI.

use crate::variables::schema_to_variables;
use crate::wadl::Grammars;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use wadlgen_common::{Diagnostics, GeneratorError, Result, Variable};

/// Top-level variables declared by grammar includes
#[derive(Debug, Clone, Default)]
pub struct GrammarPool {
    variables: Vec<Variable>,
}

impl GrammarPool {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Every pool variable whose URI equals `reference`, in pool order
    pub fn lookup<'a>(&'a self, reference: &'a str) -> impl Iterator<Item = &'a Variable> + 'a {
        self.variables
            .iter()
            .filter(move |v| v.uri.as_deref() == Some(reference))
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Resolve every grammar include relative to `base_dir`
///
/// Only `.json` includes are supported; anything else is skipped with a
/// warning. An include that cannot be read or parsed is fatal.
pub fn resolve_grammars(
    grammars: &Grammars,
    base_dir: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<GrammarPool> {
    let mut variables = Vec::new();

    for include in &grammars.includes {
        let extension = Path::new(&include.href)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        match extension.as_str() {
            ".json" => {
                let schema = read_json_schema_file(&base_dir.join(&include.href))?;
                let resolved = schema_to_variables(&schema, diagnostics);
                tracing::debug!(
                    "grammar {}: {} top-level variables",
                    include.href,
                    resolved.len()
                );
                variables.extend(resolved);
            }
            _ => diagnostics.warn(format!(
                "skipping unsupported grammar type: {extension:?} ({})",
                include.href
            )),
        }
    }

    Ok(GrammarPool::new(variables))
}

/// Read a JSON-schema file whose root must be an object
pub fn read_json_schema_file(path: &Path) -> Result<Map<String, Value>> {
    let body = fs::read_to_string(path).map_err(|e| {
        GeneratorError::Grammar(format!(
            "could not read JSON schema {}: {}",
            path.display(),
            e
        ))
    })?;

    match serde_json::from_str(&body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GeneratorError::Grammar(format!(
            "JSON schema {} is not an object",
            path.display()
        ))),
        Err(e) => Err(GeneratorError::Grammar(format!(
            "could not parse JSON schema {}: {}",
            path.display(),
            e
        ))),
    }
}
