use crate::config::CatalogConfig;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Where the HTML catalog goes when no output file is given.
pub const DEFAULT_HTML_OUTPUT: &str = "docs/api-index.html";

/// Endpoint Catalog - Builds a browsable catalog of the HTTP endpoints declared in Rust source
#[derive(Parser, Debug)]
#[command(name = "endpoint-catalog")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Source root to search (a crate's src/ directory or the package directory)
    #[arg(value_name = "SOURCE_ROOT")]
    pub source_root: PathBuf,

    /// Module path to search under, e.g. server::api (whole tree if empty)
    #[arg(short = 'n', long = "namespace", value_name = "NS")]
    pub namespace: Option<String>,

    /// Output file (html defaults to docs/api-index.html, json and yaml to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "html")]
    pub output_format: OutputFormat,

    /// Prefix of every endpoint URI
    #[arg(short = 'b', long = "base-uri", value_name = "URI")]
    pub base_uri: Option<String>,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Static HTML page (needs its support assets next to the output file)
    Html,
    /// JSON array of endpoint records
    Json,
    /// YAML sequence of endpoint records
    Yaml,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.source_root.exists() {
        anyhow::bail!("Source root does not exist: {}", args.source_root.display());
    }

    if !args.source_root.is_dir() {
        anyhow::bail!("Source root is not a directory: {}", args.source_root.display());
    }

    info!("Source root: {}", args.source_root.display());
    info!("Output format: {:?}", args.output_format);
    match (&args.output_path, args.output_format) {
        (Some(output), _) => info!("Output file: {}", output.display()),
        (None, OutputFormat::Html) => info!("Output file: {}", DEFAULT_HTML_OUTPUT),
        (None, _) => info!("Output: stdout"),
    }

    Ok(args)
}

/// Loads the configuration file, if any, and applies command-line overrides.
pub fn resolve_config(args: &CliArgs) -> Result<CatalogConfig> {
    let mut config = match &args.config_path {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => CatalogConfig::default(),
    };

    if let Some(namespace) = &args.namespace {
        config.namespace = namespace.clone();
    }
    if let Some(base_uri) = &args.base_uri {
        config.base_uri = base_uri.clone();
    }

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::discovery::source::SourceDiscovery;
    use crate::extractor::{find_endpoints, EndpointExtractor};
    use crate::renderer::HtmlRenderer;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

    info!("Starting endpoint catalog generation...");
    let config = resolve_config(&args)?;

    // Step 1: Discover resource types under the namespace
    info!("Discovering types under namespace '{}'...", config.namespace);
    let discovery = SourceDiscovery::new(args.source_root.clone());

    // Step 2: Extract endpoint records
    let extractor = EndpointExtractor::from_config(&config);
    let records = find_endpoints(&discovery, &config.namespace, &extractor).with_context(|| {
        format!("Failed to discover endpoints in {}", args.source_root.display())
    })?;

    if records.is_empty() {
        log::warn!("No endpoints found under namespace '{}'", config.namespace);
    }

    // Step 3: Render or serialize
    info!("Writing {:?} catalog...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Html => {
            let output_path = args
                .output_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HTML_OUTPUT));
            let asset_dir = asset_dir_for(&output_path);

            let written = HtmlRenderer::render(&records, &output_path, &asset_dir)
                .with_context(|| format!("Failed to render catalog to {}", output_path.display()))?;
            println!("Catalog written to {}", written.display());
            return Ok(());
        }
        OutputFormat::Json => serialize_json(&records)?,
        OutputFormat::Yaml => serialize_yaml(&records)?,
    };

    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)
            .with_context(|| format!("Failed to write catalog to {}", output_path.display()))?;
        println!("Catalog written to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete: {} endpoints", records.len());
    Ok(())
}

/// The HTML page loads its assets from its own directory.
fn asset_dir_for(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
