use crate::error::{Error, Result};
use log::debug;
use std::path::PathBuf;
use walkdir::WalkDir;

/// File scanner for traversing a source tree.
///
/// The `FileScanner` recursively walks the source root to find all Rust source files,
/// skipping `target` and hidden directories (those starting with `.`). Entries are
/// visited sorted by file name.
///
/// # Example
///
/// ```no_run
/// use endpoint_catalog::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./src"));
/// let files = scanner.scan().unwrap();
/// println!("Found {} Rust files", files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    ///
    /// # Arguments
    ///
    /// * `root_path` - The source root to scan for Rust files
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// # Returns
    ///
    /// The paths of every `.rs` file below the root, in walk order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if the root is not a directory or if any entry
    /// below it cannot be accessed.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root_path.is_dir() {
            return Err(Error::discovery(
                self.root_path.display().to_string(),
                "source root is not a directory",
            ));
        }

        let mut rust_files = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            let entry = entry.map_err(|e| {
                let location = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| self.root_path.display().to_string());
                Error::discovery(location, format!("failed to access path: {}", e))
            })?;

            // Only regular files with the .rs extension
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                rust_files.push(path.to_path_buf());
            }
        }

        debug!(
            "Scanned {}: {} Rust files",
            self.root_path.display(),
            rust_files.len()
        );

        Ok(rust_files)
    }
}
