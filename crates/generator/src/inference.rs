//! Result type inference from example response bodies
//!
//! A [`StructInferencer`] turns a literal JSON example into a Go type
//! declaration. [`GojsonInferencer`] shells out to the `gojson` tool;
//! [`JsonShapeInferencer`] does the same job in-process.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use wadlgen_common::naming::render_identifier;
use wadlgen_common::{GeneratorError, Result};

/// Capability that infers a Go type declaration from an example body
#[cfg_attr(test, mockall::automock)]
pub trait StructInferencer {
    /// Return a declaration of `type_name` shaped like `example`
    ///
    /// The text is used verbatim in the generated file. An empty string
    /// means nothing could be inferred.
    fn infer(&self, type_name: &str, example: &str) -> Result<String>;
}

/// Infers result types by running `gojson -name <TypeName>`
#[derive(Debug, Clone)]
pub struct GojsonInferencer {
    program: PathBuf,
    args: Vec<String>,
}

impl GojsonInferencer {
    /// Number of preamble lines (package clause and blank line) gojson
    /// writes before the declaration
    const PREAMBLE_LINES: usize = 2;

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument passed before `-name`
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn inference_error(&self, what: &str, err: impl std::fmt::Display) -> GeneratorError {
        GeneratorError::Inference(format!(
            "{} {}: {}",
            what,
            self.program.display(),
            err
        ))
    }
}

impl Default for GojsonInferencer {
    fn default() -> Self {
        Self::new("gojson")
    }
}

impl StructInferencer for GojsonInferencer {
    fn infer(&self, type_name: &str, example: &str) -> Result<String> {
        tracing::debug!("running {} for {}", self.program.display(), type_name);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("-name")
            .arg(type_name)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.inference_error("failed to start", e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.inference_error("no stdin pipe for", "pipe not captured"))?;

        if let Err(e) = stdin.write_all(example.as_bytes()) {
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
            return Err(self.inference_error("failed to write example to", e));
        }

        // EOF for the child
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| self.inference_error("failed to read output of", e))?;

        if !output.status.success() {
            return Err(self.inference_error("non-zero exit from", output.status));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .splitn(Self::PREAMBLE_LINES + 1, '\n')
            .nth(Self::PREAMBLE_LINES)
            .unwrap_or_default()
            .to_string())
    }
}

/// In-process inference of a Go type from the shape of a JSON value
///
/// Object keys are sorted, nested objects become inline anonymous structs,
/// arrays take the type of their first element, integral numbers map to
/// `int` and every other number to `float64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonShapeInferencer;

impl JsonShapeInferencer {
    pub fn new() -> Self {
        Self
    }
}

impl StructInferencer for JsonShapeInferencer {
    fn infer(&self, type_name: &str, example: &str) -> Result<String> {
        let value: Value = serde_json::from_str(example).map_err(|e| {
            GeneratorError::Inference(format!("example for {type_name} is not valid JSON: {e}"))
        })?;

        Ok(format!("type {} {}", type_name, shape_of(&value, 0)))
    }
}

fn shape_of(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "interface{}".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => "int".to_string(),
        Value::Number(_) => "float64".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => match items.first() {
            Some(first) => format!("[]{}", shape_of(first, depth)),
            None => "[]interface{}".to_string(),
        },
        Value::Object(map) => struct_shape(map, depth),
    }
}

fn struct_shape(map: &Map<String, Value>, depth: usize) -> String {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let indent = "\t".repeat(depth + 1);
    let mut taken = HashSet::new();
    let mut out = String::from("struct {\n");
    for key in keys {
        out.push_str(&format!(
            "{}{} {} `json:\"{}\"`\n",
            indent,
            unique_field_name(key, &mut taken),
            shape_of(&map[key], depth + 1),
            key
        ));
    }
    out.push_str(&"\t".repeat(depth));
    out.push('}');
    out
}

/// Go field name for a JSON key, suffixed with a number when another key
/// of the same struct already renders to that name
fn unique_field_name(key: &str, taken: &mut HashSet<String>) -> String {
    let base = field_name(key);
    let mut name = base.clone();
    let mut suffix = 2;
    while !taken.insert(name.clone()) {
        name = format!("{base}{suffix}");
        suffix += 1;
    }
    name
}

/// Go field name for a JSON key
fn field_name(key: &str) -> String {
    let name: String = render_identifier(key, true)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    match name.chars().next() {
        Some(c) if c.is_alphabetic() => name,
        _ => format!("Field{name}"),
    }
}
