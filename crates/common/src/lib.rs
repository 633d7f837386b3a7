//! Common types and utilities for wadlgen
//!
//! This crate contains the semantic model shared by the parser and the
//! generator (`Variable`, `Method`, `Document`), the identifier renderer,
//! the diagnostics channel and the error type.

mod diagnostics;
mod model;
pub mod naming;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use model::{Document, Method, RequestType, Variable};

use thiserror::Error;

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Structural errors in WADL document:\n  {}", .0.join("\n  "))]
    Structure(Vec<String>),

    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("Example error: {0}")]
    Example(String),

    #[error("Could not determine the base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Struct inference error: {0}")]
    Inference(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
