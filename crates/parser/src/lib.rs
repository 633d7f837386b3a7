//! WADL parsing and method resolution
//!
//! This crate turns a WADL description into the [`Document`] consumed by
//! the generator.
//!
//! ## Pipeline
//!
//! 1. The [`wadl`] reader builds a typed parse tree and rejects documents
//!    with structural errors.
//! 2. [`grammar`] loads JSON-schema includes into a pool of top-level
//!    variables addressable by URI.
//! 3. [`methods`] assembles one method per definition from request params,
//!    grammar references and responses.
//! 4. [`resources`] walks the resource tree, binding each method to its
//!    URL and inherited path params.
//!
//! [`Document`]: wadlgen_common::Document

pub mod grammar;
pub mod methods;
pub mod resources;
pub mod variables;
pub mod wadl;

pub use grammar::GrammarPool;
pub use wadl::{ParseOutput, WadlParser};

use std::path::Path;
use wadlgen_common::Result;

/// Parse a WADL file and resolve it into a document
///
/// # Arguments
/// * `path` - Path to the WADL description
/// * `base_url_override` - Replacement for every resource group's base URL
pub fn parse_wadl_file(path: &Path, base_url_override: Option<&str>) -> Result<ParseOutput> {
    WadlParser::from_file(path)?.parse(base_url_override)
}
