//! Catalog configuration, optionally loaded from a YAML file.
//!
//! ```yaml
//! base_uri: "Server/api"
//! namespace: "server::api"
//! context_types: [HttpRequest, HttpResponse, Request]
//! ```
//!
//! Every field is optional; command-line flags override file values.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Base URI every endpoint path is prefixed with unless configured otherwise.
pub const DEFAULT_BASE_URI: &str = "Server/api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Prefix of every endpoint URI
    pub base_uri: String,
    /// Module path discovery starts from; empty means the whole source tree
    pub namespace: String,
    /// Bare type names of framework context objects, never listed as parameters
    pub context_types: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            namespace: String::new(),
            context_types: vec![
                "HttpRequest".to_string(),
                "HttpResponse".to_string(),
                "Request".to_string(),
            ],
        }
    }
}

impl CatalogConfig {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or is not valid YAML for
    /// this structure.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file deserializes to `null`
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}
