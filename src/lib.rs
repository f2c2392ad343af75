//! Endpoint Catalog - a browsable index of the HTTP endpoints declared in Rust source.
//!
//! Resource types and their handler methods are annotated with plain attributes
//! (`#[route("/widgets")]`, `#[get]`, `#[path_param("id")]`, ...). This crate reads
//! those attributes statically, normalizes every route and verb into an
//! [`EndpointRecord`](extractor::EndpointRecord), and renders the records as a
//! DataTables-driven HTML page or dumps them as JSON/YAML.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Collects the `.rs` files under a source root
//! 2. [`parser`] - Parses each file with `syn`
//! 3. [`reader`] - Turns attributes into typed [`marker`]s
//! 4. [`discovery`] - Finds resource types under a module namespace, with their
//!    methods and ancestor chain
//! 5. [`extractor`] - Builds one record per route-marked type and verb-marked method
//! 6. [`renderer`] - Writes the HTML catalog
//! 7. [`serializer`] - Writes the records as JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use endpoint_catalog::discovery::source::SourceDiscovery;
//! use endpoint_catalog::extractor::{find_endpoints, EndpointExtractor};
//! use endpoint_catalog::renderer::HtmlRenderer;
//! use std::path::{Path, PathBuf};
//!
//! let discovery = SourceDiscovery::new(PathBuf::from("./server"));
//! let extractor = EndpointExtractor::new("Server/api");
//! let records = find_endpoints(&discovery, "server::api", &extractor).unwrap();
//!
//! HtmlRenderer::render(&records, Path::new("docs/api-index.html"), Path::new("docs")).unwrap();
//! ```
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod marker;
pub mod parser;
pub mod reader;
pub mod renderer;
pub mod scanner;
pub mod serializer;
