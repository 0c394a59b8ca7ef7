//! pvjson2biopax CLI
//!
//! Converts pvjson pathway graphs to BioPAX Level 3:
//! - `convert`: pvjson → RDF/XML
//! - `document`: pvjson → the assembled BioPAX JSON-LD (before serialization)
//! - `organisms`: list the organism → taxonomy table in effect

use anyhow::{anyhow, Context, Result};
use biopax_convert::{build_document, pvjson2biopax, Converter, HintXrefResolver, StaticXrefResolver, XrefResolver};
use biopax_model::{ConversionConfig, PathwayMetadata, PvjsonGraph};
use biopax_rdf::StaticContextLoader;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pvjson2biopax")]
#[command(author, version, about = "Convert pvjson pathway graphs to BioPAX Level 3 RDF/XML")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a pvjson file to BioPAX RDF/XML.
    Convert {
        #[command(flatten)]
        input: ConvertArgs,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Write the assembled BioPAX JSON-LD document instead of RDF/XML.
    Document {
        #[command(flatten)]
        input: ConvertArgs,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the organisms the taxonomy table knows.
    Organisms {
        /// Configuration JSON overriding the built-in tables
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Input pvjson file
    input: PathBuf,
    /// Pathway identifier, e.g. WP554
    #[arg(long)]
    identifier: String,
    /// Pathway version (defaults to 0)
    #[arg(long)]
    version: Option<String>,
    /// Configuration JSON overriding the built-in tables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Xref table (JSON array of resolved records); without one, lookups
    /// trust each element's own type
    #[arg(long)]
    xrefs: Option<PathBuf>,
    /// Extra JSON-LD context served offline, as `URL=FILE` (repeatable)
    #[arg(long = "context-document", value_name = "URL=FILE")]
    context_documents: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ConversionConfig> {
    match path {
        Some(path) => ConversionConfig::from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(ConversionConfig::default()),
    }
}

fn load_loader(documents: &[String]) -> Result<StaticContextLoader> {
    let mut loader = StaticContextLoader::bundled();
    for entry in documents {
        let (url, file) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("context document `{entry}` is not of the form URL=FILE"))?;
        let text = fs::read_to_string(file).with_context(|| format!("failed to read context document {file}"))?;
        let document = serde_json::from_str(&text).with_context(|| format!("invalid JSON in context document {file}"))?;
        loader = loader.with_document(url, document);
    }
    Ok(loader)
}

fn prepare(args: &ConvertArgs) -> Result<(PathwayMetadata, PvjsonGraph, Converter)> {
    let config = load_config(args.config.as_deref())?;
    let resolver: Arc<dyn XrefResolver> = match &args.xrefs {
        Some(path) => Arc::new(
            StaticXrefResolver::from_path(path)
                .with_context(|| format!("failed to load xref table from {}", path.display()))?,
        ),
        None => Arc::new(HintXrefResolver),
    };
    let loader = load_loader(&args.context_documents)?;
    let converter = Converter::new(config, resolver).with_loader(Arc::new(loader));

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let graph = PvjsonGraph::from_json_str(&text)
        .with_context(|| format!("failed to parse pvjson from {}", args.input.display()))?;
    tracing::debug!(input = %args.input.display(), elements = graph.elements.len(), "loaded pvjson");

    let mut metadata = PathwayMetadata::new(args.identifier.clone());
    if let Some(version) = &args.version {
        metadata = metadata.with_version(version.clone());
    }
    Ok((metadata, graph, converter))
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{text}"),
    }
    Ok(())
}

async fn cmd_convert(args: &ConvertArgs, out: Option<&Path>) -> Result<()> {
    let (metadata, graph, converter) = prepare(args)?;
    let xml = pvjson2biopax(&metadata, graph, &converter)
        .await
        .with_context(|| format!("failed to convert {}", args.input.display()))?;
    write_output(out, &xml)
}

async fn cmd_document(args: &ConvertArgs, out: Option<&Path>) -> Result<()> {
    let (metadata, graph, converter) = prepare(args)?;
    let document = build_document(&metadata, graph, &converter)
        .await
        .with_context(|| format!("failed to assemble {}", args.input.display()))?;
    write_output(out, &serde_json::to_string_pretty(&document)?)
}

fn cmd_organisms(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    for (name, iri) in &config.organisms {
        println!("{:<28} {}", name.bold(), iri);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert { input, out } => cmd_convert(&input, out.as_deref()).await,
        Commands::Document { input, out } => cmd_document(&input, out.as_deref()).await,
        Commands::Organisms { config } => cmd_organisms(config.as_deref()),
    }
}
