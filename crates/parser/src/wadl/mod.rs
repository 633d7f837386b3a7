//! WADL document reader
//!
//! Parses Web Application Description Language documents into a typed
//! parse tree, then resolves that tree into a [`wadlgen_common::Document`].
//!
//! ## Usage
//! ```rust,ignore
//! use wadlgen_parser::WadlParser;
//!
//! let parser = WadlParser::from_file("compute.wadl")?;
//! let output = parser.parse(None)?;
//! for method in output.document.methods() {
//!     println!("{} {}", method.http_verb, method.url);
//! }
//! ```

mod parser;
mod reader;
mod types;

pub use parser::{ParseOutput, WadlParser};
pub use reader::{first_href, read_application, ReadOutcome};
pub use types::*;
