//! wadlgen CLI
//!
//! Command-line interface for generating Go REST clients from WADL
//! descriptions.

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use wadlgen_common::{Diagnostics, Document, Severity};
use wadlgen_generator::{ClientGenerator, GojsonInferencer, JsonShapeInferencer, StructInferencer};
use wadlgen_parser::parse_wadl_file;

#[derive(Parser)]
#[command(name = "wadlgen")]
#[command(version, about = "Generate Go REST clients from WADL descriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Go client file from a WADL description
    #[command(after_help = "EXAMPLES:\n  \
        # Generate a client in package main\n  \
        wadlgen generate --wadl-file compute.wadl --to-file compute.go\n\n  \
        # Point every method at a local server\n  \
        wadlgen generate \\\n    \
        --wadl-file compute.wadl \\\n    \
        --to-file compute/client.go \\\n    \
        --package-name compute \\\n    \
        --base-url http://localhost:8774/v2\n\n  \
        # Infer result types without gojson\n  \
        wadlgen generate --wadl-file compute.wadl --to-file compute.go --inferencer builtin")]
    Generate {
        /// WADL file to parse
        #[arg(long)]
        wadl_file: PathBuf,

        /// Destination Go file
        #[arg(long)]
        to_file: PathBuf,

        /// Package the generated file belongs to
        #[arg(long, default_value = "main", value_parser = NonEmptyStringValueParser::new())]
        package_name: String,

        /// Replacement for the base URL declared by the WADL
        #[arg(long)]
        base_url: Option<String>,

        /// How result types are inferred from example responses
        #[arg(long, value_enum, default_value_t = Inferencer::Gojson)]
        inferencer: Inferencer,

        /// gojson executable used by the gojson inferencer
        #[arg(long, default_value = "gojson")]
        gojson_path: PathBuf,
    },

    /// Parse and resolve a WADL description and show its methods
    #[command(after_help = "EXAMPLES:\n  \
        # Summarize every method\n  \
        wadlgen inspect --wadl-file compute.wadl\n\n  \
        # Dump the resolved document as JSON\n  \
        wadlgen inspect --wadl-file compute.wadl --json")]
    Inspect {
        /// WADL file to parse
        #[arg(long)]
        wadl_file: PathBuf,

        /// Replacement for the base URL declared by the WADL
        #[arg(long)]
        base_url: Option<String>,

        /// Print the resolved document as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Inferencer {
    /// Run the external gojson tool
    Gojson,
    /// Infer structs in-process from the example's JSON shape
    Builtin,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("verbose mode enabled");

    match cli.command {
        Commands::Generate {
            wadl_file,
            to_file,
            package_name,
            base_url,
            inferencer,
            gojson_path,
        } => {
            let inferencer: Box<dyn StructInferencer> = match inferencer {
                Inferencer::Gojson => Box::new(GojsonInferencer::new(gojson_path)),
                Inferencer::Builtin => Box::new(JsonShapeInferencer::new()),
            };
            generate_command(
                &wadl_file,
                &to_file,
                &package_name,
                base_url.as_deref(),
                inferencer,
            )?;
        }
        Commands::Inspect {
            wadl_file,
            base_url,
            json,
        } => {
            inspect_command(&wadl_file, base_url.as_deref(), json, cli.verbose)?;
        }
    }

    Ok(())
}

/// Log to stderr; `--verbose` means debug, otherwise `RUST_LOG` or errors only
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn generate_command(
    wadl_file: &Path,
    to_file: &Path,
    package_name: &str,
    base_url: Option<&str>,
    inferencer: Box<dyn StructInferencer>,
) -> Result<()> {
    println!("{} Parsing WADL file: {}", "→".cyan(), wadl_file.display());
    if let Some(url) = base_url {
        println!("{} Using base URL: {}", "→".cyan(), url.yellow());
    }

    let parsed = parse_wadl_file(wadl_file, base_url)
        .with_context(|| format!("Failed to parse {}", wadl_file.display()))?;
    print_diagnostics(&parsed.diagnostics);
    println!(
        "{} Resolved {} methods",
        "✓".green(),
        parsed.document.len()
    );

    println!("{} Generating Go client...", "→".cyan());
    let generator = ClientGenerator::new(parsed.document, package_name, inferencer)
        .context("Failed to create generator")?;
    let diagnostics = generator
        .generate_to_file(to_file)
        .context("Failed to generate client")?;
    print_diagnostics(&diagnostics);

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("  📄 {} (package {})", to_file.display(), package_name.cyan());

    Ok(())
}

fn inspect_command(
    wadl_file: &Path,
    base_url: Option<&str>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let parsed = parse_wadl_file(wadl_file, base_url)
        .with_context(|| format!("Failed to parse {}", wadl_file.display()))?;

    if json {
        let rendered = serde_json::to_string_pretty(&parsed.document)
            .context("Failed to serialize document")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} Parsing WADL file: {}", "→".cyan(), wadl_file.display());
    print_diagnostics(&parsed.diagnostics);
    println!("\n{}", "✓ Parse successful!".green().bold());
    print_document(&parsed.document, verbose);

    Ok(())
}

fn print_document(document: &Document, verbose: bool) {
    println!("\n{} {}", "Methods:".bold(), document.len());

    for method in document.methods() {
        let url = if method.is_resolved() {
            method.url.normal()
        } else {
            "<unbound>".red()
        };
        println!(
            "  • {} {} {}",
            method.name.cyan(),
            method.http_verb.yellow(),
            url
        );

        if verbose {
            for argument in &method.arguments {
                println!(
                    "      {} {} ({}{})",
                    argument.name,
                    argument.var_type.dimmed(),
                    argument.request_type,
                    if argument.required { ", required" } else { "" }
                );
            }
            if !method.acceptable_status.is_empty() {
                println!("      status: {}", method.acceptable_status.join(" "));
            }
            if !method.results_example.is_empty() {
                println!("      results: from example");
            } else {
                println!("      results: {} fields", method.results.len());
            }
        }
    }
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        match diagnostic.severity {
            Severity::Warning => println!("  {} {}", "⚠".yellow(), diagnostic.message),
            Severity::Info => println!("  {} {}", "ℹ".blue(), diagnostic.message.dimmed()),
        }
    }
}
