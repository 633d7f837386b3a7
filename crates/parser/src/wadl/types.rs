//! WADL parse tree
//!
//! A typed view of the elements wadlgen cares about. Anything else in the
//! document is skipped by the reader.

use serde::Serialize;

/// `<application>` root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Application {
    pub docs: Vec<Doc>,

    pub grammars: Grammars,

    /// `<resources>` groups, each with its own base URL
    pub resources: Vec<Resources>,

    /// Top-level method definitions, referenced from resources by href
    pub methods: Vec<Method>,
}

/// `<grammars>` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grammars {
    pub includes: Vec<Include>,
}

/// `<include href="...">` inside `<grammars>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Include {
    pub href: String,
}

/// `<resources base="...">`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resources {
    pub base: String,
    pub resources: Vec<Resource>,
}

/// `<resource path="...">`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: Option<String>,
    pub path: String,
    pub docs: Vec<Doc>,
    pub params: Vec<Param>,
    pub methods: Vec<MethodBinding>,
    pub resources: Vec<Resource>,
}

/// A `<method>` element inside a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodBinding {
    /// `<method href="#id"/>`, pointing at a top-level method
    Reference(String),
    /// A full method definition placed directly in the resource
    Inline(Method),
}

/// `<method id="..." name="GET">`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Method {
    pub id: String,
    /// HTTP verb
    pub name: String,
    pub docs: Vec<Doc>,
    pub request: Option<Request>,
    pub responses: Vec<Response>,
}

/// `<request>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Request {
    pub docs: Vec<Doc>,
    pub params: Vec<Param>,
    pub representations: Vec<Representation>,
}

/// `<response status="200 203">`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: String,
    pub docs: Vec<Doc>,
    pub params: Vec<Param>,
    pub representations: Vec<Representation>,
}

/// `<representation mediaType="..." json:ref="...">`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Representation {
    pub media_type: String,
    /// Grammar reference (`json:ref`), matched against schema ids
    pub json_ref: Option<String>,
    pub docs: Vec<Doc>,
    pub params: Vec<Param>,
}

/// `<param>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub style: wadlgen_common::RequestType,
    pub required: bool,
    pub path: Option<String>,
    pub docs: Vec<Doc>,
}

/// `<doc>`
///
/// `content` is the raw inner markup, so nested elements such as `<para>`
/// or `<xsdxt:code href="..."/>` are preserved as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Doc {
    pub title: Option<String>,
    pub content: String,
}

impl Application {
    /// Every method definition in the document: top-level ones first, then
    /// inline definitions in resource-tree order
    pub fn all_methods(&self) -> Vec<&Method> {
        let mut methods: Vec<&Method> = self.methods.iter().collect();
        for group in &self.resources {
            collect_inline_methods(&group.resources, &mut methods);
        }
        methods
    }
}

fn collect_inline_methods<'a>(resources: &'a [Resource], out: &mut Vec<&'a Method>) {
    for resource in resources {
        for binding in &resource.methods {
            if let MethodBinding::Inline(method) = binding {
                out.push(method);
            }
        }
        collect_inline_methods(&resource.resources, out);
    }
}
