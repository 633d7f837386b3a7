//! WADL document parser

use super::reader::read_application;
use super::types::Application;
use crate::grammar::resolve_grammars;
use crate::methods::assemble_methods;
use crate::resources::bind_resources;
use std::fs;
use std::path::{Path, PathBuf};
use wadlgen_common::{Diagnostics, Document, GeneratorError, Result};

/// A resolved document together with the recoverable diagnostics
/// collected while building it
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub document: Document,
    pub diagnostics: Diagnostics,
}

/// WADL parser
///
/// Holds the parse tree of one description file. Grammar includes and
/// example files are resolved relative to `base_dir`, the directory the
/// description lives in.
pub struct WadlParser {
    /// Loaded parse tree
    app: Application,

    /// Directory that relative hrefs are resolved against
    base_dir: PathBuf,
}

impl WadlParser {
    /// Load a WADL document from file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = WadlParser::from_file("docs/compute.wadl")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read WADL file {}: {}",
                path.display(),
                e
            ))
        })?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_xml(&content, base_dir)
    }

    /// Parse a WADL document from an XML string
    ///
    /// Any structural error in the document aborts parsing.
    pub fn from_xml(xml: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let outcome = read_application(xml)?;
        if !outcome.errors.is_empty() {
            return Err(GeneratorError::Structure(outcome.errors));
        }

        Ok(Self {
            app: outcome.application,
            base_dir: base_dir.into(),
        })
    }

    /// Resolve the parse tree into a document of methods
    ///
    /// Grammar includes are loaded first, then every method definition is
    /// assembled, then the resource tree binds URLs and inherited params.
    /// `base_url_override` replaces the base of every resource group.
    pub fn parse(&self, base_url_override: Option<&str>) -> Result<ParseOutput> {
        let mut diagnostics = Diagnostics::new();

        let pool = resolve_grammars(&self.app.grammars, &self.base_dir, &mut diagnostics)?;
        tracing::debug!("grammar pool holds {} variables", pool.len());

        let mut document = assemble_methods(
            &self.app.all_methods(),
            &pool,
            &self.base_dir,
            &mut diagnostics,
        )?;

        bind_resources(
            &mut document,
            &self.app.resources,
            base_url_override,
            &mut diagnostics,
        )?;

        Ok(ParseOutput {
            document,
            diagnostics,
        })
    }

    /// Get reference to the underlying parse tree
    pub fn application(&self) -> &Application {
        &self.app
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
