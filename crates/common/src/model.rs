//! Semantic model built from a WADL document
//!
//! The parser produces a [`Document`] of [`Method`]s, each owning its
//! [`Variable`] trees. The generator only reads it.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::str::FromStr;

/// Where in the HTTP request a variable is carried
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Substituted into a URL path segment
    Template,
    /// Appended to the query string
    Query,
    /// Serialized into the request or response body
    #[default]
    Plain,
    /// Sent as an HTTP header
    Header,
    /// Matrix URI parameter; carried on the type but not wired into requests
    Matrix,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Template => "template",
            RequestType::Query => "query",
            RequestType::Plain => "plain",
            RequestType::Header => "header",
            RequestType::Matrix => "matrix",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "template" => Ok(RequestType::Template),
            "query" => Ok(RequestType::Query),
            "plain" => Ok(RequestType::Plain),
            "header" => Ok(RequestType::Header),
            "matrix" => Ok(RequestType::Matrix),
            other => Err(format!("unknown param style: {other}")),
        }
    }
}

/// A typed parameter or field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Raw name, before any casing is applied
    pub name: String,

    /// Scalar type tag as written in the description (e.g. `xsd:string`)
    #[serde(rename = "type")]
    pub var_type: String,

    pub request_type: RequestType,

    pub required: bool,

    /// Reference key of a grammar-declared top-level variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    /// Template path suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Child fields of a nested object shape
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded: Vec<Variable>,
}

impl Variable {
    /// Create a plain, optional variable with the given name and type
    pub fn new(name: impl Into<String>, var_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: var_type.into(),
            ..Self::default()
        }
    }

    /// Whether this variable must be rendered as its own named type
    pub fn is_nested(&self) -> bool {
        !self.embedded.is_empty()
    }
}

/// One generated operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Unique name across the document (the WADL method id)
    pub name: String,

    pub http_verb: String,

    /// URL template with percent-encoded `{name}` placeholders; empty until
    /// the resource tree has been walked
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    pub arguments: Vec<Variable>,

    pub results: Vec<Variable>,

    /// Raw example response body; takes priority over `results` for the
    /// result type when non-empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub results_example: String,

    /// Status tokens treated as success; empty accepts anything
    pub acceptable_status: Vec<String>,
}

impl Method {
    pub fn new(name: impl Into<String>, http_verb: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            http_verb: http_verb.into(),
            ..Self::default()
        }
    }

    /// Whether a resource binding has set the URL
    pub fn is_resolved(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Mapping from method name to method
///
/// Keys are unique: inserting a method whose name already exists replaces
/// the earlier definition. Iteration is sorted by name so generated output
/// is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    methods: BTreeMap<String, Method>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a method, returning the definition it replaced, if any
    pub fn insert(&mut self, method: Method) -> Option<Method> {
        self.methods.insert(method.name.clone(), method)
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Method> {
        self.methods.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Methods in name order
    pub fn methods(&self) -> btree_map::Values<'_, String, Method> {
        self.methods.values()
    }
}
