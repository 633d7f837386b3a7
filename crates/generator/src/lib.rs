//! Go client generation for wadlgen
//!
//! This crate turns a resolved [`Document`] into a single Go source file:
//! a parameter type, a result type and a request function per method.

mod collection;
mod docs;
mod inference;
mod templates;
mod type_mapper;

pub use collection::json_tag;
pub use docs::render_documentation;
pub use inference::{GojsonInferencer, JsonShapeInferencer, StructInferencer};
pub use type_mapper::go_type;

use collection::render_collection;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tera::{Context, Tera};
use wadlgen_common::naming::{params_type_name, render_identifier, results_type_name};
use wadlgen_common::{Diagnostics, Document, GeneratorError, Method, RequestType, Result};

/// Go packages the generated code may reference, keyed by the name used
/// at call sites
const GO_IMPORTS: &[(&str, &str)] = &[
    ("bytes", "bytes"),
    ("json", "encoding/json"),
    ("fmt", "fmt"),
    ("ioutil", "io/ioutil"),
    ("http", "net/http"),
    ("strings", "strings"),
    ("time", "time"),
];

/// Generated source plus everything worth reporting about it
#[derive(Debug, Clone)]
pub struct GeneratedSource {
    pub code: String,
    pub diagnostics: Diagnostics,
}

/// Go client generator
///
/// Renders every method of a [`Document`] in name order, behind a file
/// header with the package clause, the import block and the
/// `RequestHandlerFn` type.
pub struct ClientGenerator {
    document: Document,
    package_name: String,
    inferencer: Box<dyn StructInferencer>,
    tera: Tera,
}

impl ClientGenerator {
    /// Create a new client generator
    pub fn new(
        document: Document,
        package_name: impl Into<String>,
        inferencer: Box<dyn StructInferencer>,
    ) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self {
            document,
            package_name: package_name.into(),
            inferencer,
            tera,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Render the whole Go file
    pub fn render(&self) -> Result<GeneratedSource> {
        let mut diagnostics = Diagnostics::new();
        let mut body = String::new();

        for method in self.document.methods() {
            tracing::debug!("rendering method {}", method.name);
            self.render_method(&mut body, method, &mut diagnostics)?;
        }

        let mut code = self.render_header(&body)?;
        code.push_str(&body);

        Ok(GeneratedSource { code, diagnostics })
    }

    /// Render the Go file and write it to `path`
    pub fn generate_to_file(&self, path: &Path) -> Result<Diagnostics> {
        let generated = self.render()?;

        fs::write(path, &generated.code).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(generated.diagnostics)
    }

    /// Package clause, imports and the request handler type
    fn render_header(&self, body: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("package_name", &self.package_name);
        context.insert("imports", &required_imports(body));
        templates::render(&self.tera, "file_header.go", &context)
    }

    /// Params type, results type and request function for one method
    fn render_method(
        &self,
        out: &mut String,
        method: &Method,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let stem = render_identifier(&method.name, false);

        if !method.is_resolved() {
            diagnostics.warn(format!(
                "method {} is not bound to any resource; emitting it with an empty URL",
                method.name
            ));
        }

        render_collection(
            &self.tera,
            out,
            &stem,
            &method.arguments,
            params_type_name,
            diagnostics,
        )?;

        let results_name = results_type_name(&stem);
        let inferred = if method.results_example.trim().is_empty() {
            String::new()
        } else {
            self.inferencer
                .infer(&results_name, &method.results_example)?
        };

        if inferred.trim().is_empty() {
            render_collection(
                &self.tera,
                out,
                &stem,
                &method.results,
                results_type_name,
                diagnostics,
            )?;
        } else {
            out.push_str(&format!("\n\n{}\n", inferred.trim_end()));
        }

        let mut template_vars = Vec::new();
        let mut query_vars = Vec::new();
        let mut header_vars = Vec::new();
        for argument in &method.arguments {
            match argument.request_type {
                RequestType::Template => template_vars.push(argument.name.as_str()),
                RequestType::Query => query_vars.push(argument.name.as_str()),
                RequestType::Header => header_vars.push(argument.name.as_str()),
                RequestType::Plain => {}
                RequestType::Matrix => diagnostics.info(format!(
                    "{}: matrix param {} is carried on the params type but not sent",
                    method.name, argument.name
                )),
            }
        }

        let mut context = Context::new();
        context.insert("documentation", &method.documentation);
        context.insert("fun_name", &stem);
        context.insert("arg_type", &params_type_name(&stem));
        context.insert("response_type", &results_name);
        context.insert("http_verb", &method.http_verb);
        context.insert("url", &method.url);
        context.insert("template_vars", &template_vars);
        context.insert("has_query_vars", &!query_vars.is_empty());
        context.insert("query_vars", &query_vars);
        context.insert("header_vars", &header_vars);
        context.insert("acceptable_status", &method.acceptable_status.join(","));

        out.push_str(&templates::render(&self.tera, "function.go", &context)?);
        Ok(())
    }
}

/// Import paths for every package `body` references, in sorted order
///
/// Comment lines are not code, so documentation mentioning `strings.X`
/// adds nothing. `net/http` is always present for `RequestHandlerFn`.
fn required_imports(body: &str) -> Vec<&'static str> {
    static QUALIFIED: OnceLock<Option<Regex>> = OnceLock::new();
    let qualified = QUALIFIED
        .get_or_init(|| Regex::new(r"\b(bytes|json|fmt|ioutil|http|strings|time)\.[A-Z]").ok());

    let used: Vec<&str> = match qualified {
        Some(re) => body
            .lines()
            .filter(|line| !line.trim_start().starts_with("//"))
            .flat_map(move |line| re.captures_iter(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect(),
        None => Vec::new(),
    };

    GO_IMPORTS
        .iter()
        .filter(|(name, _)| *name == "http" || used.contains(name))
        .map(|(_, path)| *path)
        .collect()
}

/// Generate a Go client file (convenience function)
pub fn generate_client(
    document: Document,
    package_name: &str,
    inferencer: Box<dyn StructInferencer>,
    output_path: &Path,
) -> Result<Diagnostics> {
    let generator = ClientGenerator::new(document, package_name, inferencer)?;
    generator.generate_to_file(output_path)
}
