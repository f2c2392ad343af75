use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// AST parser for Rust source files.
///
/// Uses `syn` to turn each source file into a syntax tree that the discovery layer
/// walks for resource types and their handler methods.
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single Rust source file into an AST.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `.rs` file
    ///
    /// # Returns
    ///
    /// The file's syntax tree together with its path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if the file cannot be read or contains invalid
    /// Rust syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        // Read file content
        let content = fs::read_to_string(path).map_err(|e| {
            Error::discovery(path.display().to_string(), format!("failed to read file: {}", e))
        })?;

        // Parse into a syntax tree using syn
        let syntax_tree = syn::parse_file(&content).map_err(|e| {
            Error::discovery(
                path.display().to_string(),
                format!("failed to parse Rust syntax: {}", e),
            )
        })?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses every file, stopping at the first failure.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files to parse, typically from [`FileScanner::scan`](crate::scanner::FileScanner::scan)
    pub fn parse_files(paths: &[PathBuf]) -> Result<Vec<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let parsed = paths
            .iter()
            .map(|path| Self::parse_file(path))
            .collect::<Result<Vec<_>>>()?;

        debug!("Parsing complete: {} files", parsed.len());
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_parse_valid_rust_file() {
        let temp_dir = TempDir::new().unwrap();
        let code = r#"
            #[route("/widgets")]
            pub struct WidgetResource;

            impl WidgetResource {
                #[get]
                pub fn list(&self) -> Vec<String> { vec![] }
            }
        "#;

        let file_path = create_temp_file(&temp_dir, "widgets.rs", code);
        let parsed = AstParser::parse_file(&file_path).unwrap();

        assert_eq!(parsed.path, file_path);
        assert_eq!(parsed.syntax_tree.items.len(), 2);
    }

    #[test]
    fn test_parse_invalid_rust_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_temp_file(&temp_dir, "invalid.rs", "pub fn broken( {");

        let err = AstParser::parse_file(&file_path).unwrap_err();

        assert!(matches!(err, Error::Discovery { .. }));
        assert!(err.to_string().contains("failed to parse Rust syntax"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let err = AstParser::parse_file(Path::new("/nonexistent/file.rs")).unwrap_err();

        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn test_parse_files_stops_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_temp_file(&temp_dir, "good.rs", "pub struct World;");
        let bad = create_temp_file(&temp_dir, "bad.rs", "struct Missing }");

        assert!(AstParser::parse_files(&[good.clone(), bad]).is_err());

        let parsed = AstParser::parse_files(&[good.clone()]).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].path, good);
    }

    #[test]
    fn test_parse_files_empty_list() {
        assert!(AstParser::parse_files(&[]).unwrap().is_empty());
    }
}
