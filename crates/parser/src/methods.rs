//! Method assembler
//!
//! Builds one [`Method`] per WADL method definition, merging request
//! params, grammar-referenced body types and response params. URLs are left
//! empty here; the resource walker fills them in.

use crate::grammar::GrammarPool;
use crate::variables::{docs_to_documentation, params_to_variables};
use crate::wadl::{self, first_href, Representation};
use std::fs;
use std::path::Path;
use wadlgen_common::{Diagnostics, Document, GeneratorError, Method, Result};

/// The only media type whose representations are used
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Assemble every method definition into a document keyed by method id
///
/// A method id that appears twice replaces the earlier definition and
/// produces a warning.
pub fn assemble_methods(
    raw_methods: &[&wadl::Method],
    pool: &GrammarPool,
    base_dir: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<Document> {
    let mut document = Document::new();

    for raw in raw_methods {
        tracing::debug!("assembling method {}", raw.id);
        let method = assemble_method(raw, pool, base_dir, diagnostics)?;
        let name = method.name.clone();
        if document.insert(method).is_some() {
            diagnostics.warn(format!(
                "method {name} is defined more than once; the last definition wins"
            ));
        }
    }

    Ok(document)
}

/// Assemble a single method definition
pub fn assemble_method(
    raw: &wadl::Method,
    pool: &GrammarPool,
    base_dir: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<Method> {
    let mut method = Method {
        documentation: docs_to_documentation(&raw.docs),
        ..Method::new(raw.id.clone(), raw.name.clone())
    };

    if let Some(request) = &raw.request {
        method.arguments.extend(params_to_variables(&request.params));

        for rep in &request.representations {
            if rep.media_type != JSON_MEDIA_TYPE {
                diagnostics.info(format!(
                    "skipping request representation: {}",
                    rep.media_type
                ));
                continue;
            }

            if let Some(reference) = rep.json_ref.as_deref().filter(|r| !r.is_empty()) {
                tracing::debug!("{}: json:ref {}", raw.id, reference);
                method.arguments.extend(pool.lookup(reference).cloned());
            }

            method.arguments.extend(params_to_variables(&rep.params));
        }
    }

    for response in &raw.responses {
        method.results.extend(params_to_variables(&response.params));
        for status in response.status.split_whitespace() {
            if !method.acceptable_status.iter().any(|s| s == status) {
                method.acceptable_status.push(status.to_string());
            }
        }

        for rep in &response.representations {
            if rep.media_type != JSON_MEDIA_TYPE {
                diagnostics.info(format!(
                    "skipping response representation: {}",
                    rep.media_type
                ));
                continue;
            }

            match read_example(rep, base_dir)? {
                Some(example) => method.results_example = example,
                None => diagnostics.info(format!(
                    "{}: JSON response representation has no documentation to take an example from",
                    raw.id
                )),
            }
            method.results.extend(params_to_variables(&rep.params));
            break;
        }
    }

    Ok(method)
}

/// Read the example body linked from a representation's first `<doc>`
///
/// Returns `None` when the representation has no documentation. A doc that
/// links nothing, or a linked file that cannot be read, is fatal.
fn read_example(rep: &Representation, base_dir: &Path) -> Result<Option<String>> {
    let Some(doc) = rep.docs.first() else {
        return Ok(None);
    };

    let href = first_href(&doc.content)?.ok_or_else(|| {
        GeneratorError::Example(format!(
            "example documentation does not reference a file: {}",
            doc.content.trim()
        ))
    })?;

    let path = base_dir.join(&href);
    tracing::debug!("reading example file {}", path.display());
    let example = fs::read_to_string(&path).map_err(|e| {
        GeneratorError::Example(format!(
            "could not read example {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(Some(example))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wadl::{Doc, Param, Request, Response};
    use tempfile::TempDir;
    use wadlgen_common::{RequestType, Variable};

    fn param(name: &str, style: RequestType) -> Param {
        Param {
            name: name.to_string(),
            param_type: "xsd:string".to_string(),
            style,
            ..Param::default()
        }
    }

    fn json_rep() -> Representation {
        Representation {
            media_type: JSON_MEDIA_TYPE.to_string(),
            ..Representation::default()
        }
    }

    #[test]
    fn test_request_arguments_in_order() {
        let mut widget = Variable::new("widget", "object");
        widget.uri = Some("#Widget".to_string());
        widget.embedded = vec![Variable::new("a", "string"), Variable::new("b", "string")];
        let pool = GrammarPool::new(vec![widget]);

        let raw = wadl::Method {
            id: "createWidget".to_string(),
            name: "POST".to_string(),
            request: Some(Request {
                params: vec![param("X-Auth-Token", RequestType::Header)],
                representations: vec![
                    Representation {
                        media_type: "application/xml".to_string(),
                        params: vec![param("ignored", RequestType::Plain)],
                        ..Representation::default()
                    },
                    Representation {
                        json_ref: Some("#Widget".to_string()),
                        params: vec![param("dry_run", RequestType::Plain)],
                        ..json_rep()
                    },
                ],
                ..Request::default()
            }),
            ..wadl::Method::default()
        };

        let mut diags = Diagnostics::new();
        let method = assemble_method(&raw, &pool, Path::new("."), &mut diags).unwrap();

        let names: Vec<&str> = method.arguments.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["X-Auth-Token", "widget", "dry_run"]);
        assert_eq!(method.arguments[1].embedded.len(), 2);
        assert_eq!(method.http_verb, "POST");
        assert!(method.url.is_empty());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_response_status_and_example() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("samples")).unwrap();
        std::fs::write(dir.path().join("samples/pet.json"), r#"{"name": "rex"}"#).unwrap();

        let raw = wadl::Method {
            id: "getPet".to_string(),
            name: "GET".to_string(),
            responses: vec![
                Response {
                    status: "200  203".to_string(),
                    params: vec![param("etag", RequestType::Header)],
                    representations: vec![
                        Representation {
                            docs: vec![Doc {
                                title: None,
                                content: r#"<xsdxt:code href="samples/pet.json"/>"#.to_string(),
                            }],
                            params: vec![param("name", RequestType::Plain)],
                            ..json_rep()
                        },
                        Representation {
                            docs: vec![Doc {
                                title: None,
                                content: r#"<xsdxt:code href="samples/missing.json"/>"#
                                    .to_string(),
                            }],
                            ..json_rep()
                        },
                    ],
                    ..Response::default()
                },
                Response {
                    status: "404".to_string(),
                    ..Response::default()
                },
            ],
            ..wadl::Method::default()
        };

        let mut diags = Diagnostics::new();
        let method =
            assemble_method(&raw, &GrammarPool::default(), dir.path(), &mut diags).unwrap();

        assert_eq!(method.acceptable_status, vec!["200", "203", "404"]);
        assert_eq!(method.results_example, r#"{"name": "rex"}"#);
        let names: Vec<&str> = method.results.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["etag", "name"]);
    }

    #[test]
    fn test_shared_status_codes_are_listed_once() {
        let raw = wadl::Method {
            id: "getPet".to_string(),
            name: "GET".to_string(),
            responses: vec![
                Response {
                    status: "200".to_string(),
                    ..Response::default()
                },
                Response {
                    status: "200 203".to_string(),
                    ..Response::default()
                },
                Response {
                    status: "203 200 404".to_string(),
                    ..Response::default()
                },
            ],
            ..wadl::Method::default()
        };

        let mut diags = Diagnostics::new();
        let method =
            assemble_method(&raw, &GrammarPool::default(), Path::new("."), &mut diags).unwrap();
        assert_eq!(method.acceptable_status, vec!["200", "203", "404"]);
    }

    #[test]
    fn test_unreadable_example_is_fatal() {
        let raw = wadl::Method {
            id: "getPet".to_string(),
            name: "GET".to_string(),
            responses: vec![Response {
                status: "200".to_string(),
                representations: vec![Representation {
                    docs: vec![Doc {
                        title: None,
                        content: r#"<xsdxt:code href="nope.json"/>"#.to_string(),
                    }],
                    ..json_rep()
                }],
                ..Response::default()
            }],
            ..wadl::Method::default()
        };

        let dir = TempDir::new().unwrap();
        let mut diags = Diagnostics::new();
        let result = assemble_method(&raw, &GrammarPool::default(), dir.path(), &mut diags);
        assert!(matches!(result, Err(GeneratorError::Example(_))));
    }

    #[test]
    fn test_duplicate_method_ids_last_wins() {
        let first = wadl::Method {
            id: "getPet".to_string(),
            name: "GET".to_string(),
            ..wadl::Method::default()
        };
        let second = wadl::Method {
            id: "getPet".to_string(),
            name: "HEAD".to_string(),
            ..wadl::Method::default()
        };

        let mut diags = Diagnostics::new();
        let doc = assemble_methods(
            &[&first, &second],
            &GrammarPool::default(),
            Path::new("."),
            &mut diags,
        )
        .unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("getPet").unwrap().http_verb, "HEAD");
        assert_eq!(diags.warnings().count(), 1);
    }
}
