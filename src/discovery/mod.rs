//! Content discovery and project configuration.
//!
//! Finds the documents to expand and the `snippets.yaml` that configures
//! them.
//!
//! # Example
//!
//! ```ignore
//! use snippets::discovery::discover;
//!
//! let result = discover("./site")?;
//! println!("Found {} documents", result.scan.total());
//!
//! let registry = result.registry();
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::registry::Registry;

pub use manifest::Manifest;
pub use scanner::{scan_directory, scan_paths, scan_sources, ContentFile, ScanResult};

/// The name of the configuration file.
pub const MANIFEST_FILENAME: &str = "snippets.yaml";

/// Result of discovering content in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no snippets.yaml was found).
    pub manifest: Manifest,

    /// Whether a snippets.yaml was found.
    pub has_manifest: bool,

    /// Discovered content files.
    pub scan: ScanResult,
}

impl DiscoveryResult {
    /// Registry with the default snippets and the configured templates.
    pub fn registry(&self) -> Registry {
        self.manifest.registry(&self.root)
    }
}

/// Load the manifest for a project, if there is one.
///
/// `config` overrides the default `<root>/snippets.yaml` location.
pub fn load_manifest(root: &Path, config: Option<&Path>) -> Result<(Manifest, bool)> {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => root.join(MANIFEST_FILENAME),
    };

    if config.is_some() || path.exists() {
        log::debug!("loading config from {}", path.display());
        Ok((Manifest::load(&path)?, true))
    } else {
        Ok((Manifest::default(), false))
    }
}

/// Discover content in a project directory.
///
/// Uses the sources listed in `snippets.yaml` when present, otherwise
/// scans the whole directory.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref().to_path_buf();
    let (manifest, has_manifest) = load_manifest(&root, None)?;

    let scan = scan_sources(&manifest.effective_sources(), &root, &manifest);

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        scan,
    })
}

/// Discover content from explicit paths with a given manifest.
pub fn discover_paths(
    root: impl AsRef<Path>,
    manifest: Manifest,
    paths: &[PathBuf],
) -> DiscoveryResult {
    let scan = scan_paths(paths, &manifest);

    DiscoveryResult {
        root: root.as_ref().to_path_buf(),
        manifest,
        has_manifest: false,
        scan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempdir().unwrap();
        let result = discover(dir.path()).unwrap();

        assert!(!result.has_manifest);
        assert!(result.scan.is_empty());
    }

    #[test]
    fn test_discover_without_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.md"), "(tel: 123)").unwrap();

        let result = discover(dir.path()).unwrap();

        assert!(!result.has_manifest);
        assert_eq!(result.scan.total(), 1);
        assert!(result.registry().contains("tel"));
    }

    #[test]
    fn test_discover_with_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("snippets.yaml"),
            r#"
sources:
  - content/
output: build
snippets:
  shout:
    params: [text]
    template: "<strong>{text}</strong>"
"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        fs::write(dir.path().join("content/a.md"), "a").unwrap();
        fs::write(dir.path().join("outside.md"), "b").unwrap();

        let result = discover(dir.path()).unwrap();

        assert!(result.has_manifest);
        assert_eq!(result.manifest.output, PathBuf::from("build"));
        assert_eq!(result.scan.total(), 1);
        assert!(result.registry().contains("shout"));
    }

    #[test]
    fn test_load_manifest_explicit_missing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("other.yaml");
        assert!(load_manifest(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_discover_paths() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();

        let result = discover_paths(dir.path(), Manifest::default(), &[dir.path().to_path_buf()]);
        assert_eq!(result.scan.total(), 1);
    }
}
