//! Machine-readable output of the endpoint catalog.
//!
//! The HTML page is meant for people; JSON and YAML dumps of the same records are
//! handy for diffing catalogs between releases or feeding other tools. Neither needs
//! the page's support assets.

use crate::error::Result;
use crate::extractor::EndpointRecord;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes the records as a YAML sequence.
///
/// # Errors
///
/// Returns [`Error::Serialization`](crate::error::Error::Serialization) if serialization fails.
pub fn serialize_yaml(records: &[EndpointRecord]) -> Result<String> {
    debug!("Serializing {} endpoint records to YAML", records.len());
    Ok(serde_yaml::to_string(records)?)
}

/// Serializes the records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`Error::Serialization`](crate::error::Error::Serialization) if serialization fails.
pub fn serialize_json(records: &[EndpointRecord]) -> Result<String> {
    debug!("Serializing {} endpoint records to JSON", records.len());
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes string content to a file, creating missing parent directories.
///
/// An existing file is overwritten.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
