use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library.
///
/// Extraction itself never fails: absent or malformed markers become absent
/// fields. Everything here aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A support file required by the HTML report is not in the asset directory
    #[error("required asset is missing: {}", .0.display())]
    AssetMissing(PathBuf),

    /// The namespace could not be resolved or a source file could not be loaded
    #[error("discovery failed at {location}: {message}")]
    Discovery { location: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn discovery(location: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Discovery {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_missing_message_names_file() {
        let err = Error::AssetMissing(PathBuf::from("/docs/jquery.js"));
        assert_eq!(err.to_string(), "required asset is missing: /docs/jquery.js");
    }

    #[test]
    fn test_discovery_message() {
        let err = Error::discovery("server::api", "namespace not found");
        assert_eq!(
            err.to_string(),
            "discovery failed at server::api: namespace not found"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
