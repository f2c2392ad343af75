//! Endpoint Catalog - command-line tool for documenting attribute-declared HTTP endpoints.
//!
//! # Usage
//!
//! ```bash
//! endpoint-catalog [OPTIONS] <SOURCE_ROOT>
//! ```
//!
//! Render the HTML catalog (assets must already be in `docs/`):
//! ```bash
//! endpoint-catalog ./server -n server::api -o docs/api-index.html
//! ```
//!
//! Dump the records as JSON:
//! ```bash
//! endpoint-catalog ./server -f json -o catalog.json
//! ```

use anyhow::Result;
use clap::Parser;
use endpoint_catalog::cli;
use log::info;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can pick the log level
    let parsed = cli::CliArgs::parse();

    let log_level = if parsed.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Endpoint catalog starting...");

    let args = cli::parse_args_from_parsed(parsed)?;
    cli::run(args)?;

    Ok(())
}
