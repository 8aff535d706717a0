//! File system scanner for discovering content documents.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::Manifest;

/// A content file and the directory it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    pub path: PathBuf,
    /// Source directory the file was found under. Output paths mirror
    /// the file's location relative to it.
    pub base: PathBuf,
}

impl ContentFile {
    /// Path relative to the source directory.
    pub fn relative(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }
}

/// Result of scanning for content files.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<ContentFile>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Merge another scan result into this one.
    pub fn merge(&mut self, other: ScanResult) {
        self.files.extend(other.files);
    }
}

/// Recursively scan a directory for content files.
///
/// Files are returned in path order so output is deterministic.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        log::debug!("source {} does not exist", root.display());
        return result;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_dir() || manifest.is_excluded(path) || !manifest.is_content_file(path) {
            continue;
        }

        log::trace!("found {}", path.display());
        result.files.push(ContentFile {
            path: path.to_path_buf(),
            base: root.to_path_buf(),
        });
    }

    result
}

/// Scan multiple source paths relative to `base_path`.
///
/// A source may be a directory or a single file.
pub fn scan_sources(sources: &[String], base_path: &Path, manifest: &Manifest) -> ScanResult {
    let paths: Vec<PathBuf> = sources
        .iter()
        .map(|source| {
            if Path::new(source).is_absolute() {
                PathBuf::from(source)
            } else {
                base_path.join(source)
            }
        })
        .collect();

    scan_paths(&paths, manifest)
}

/// Scan explicit paths: directories recursively, files as given.
pub fn scan_paths(paths: &[PathBuf], manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    for path in paths {
        if path.is_file() {
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            result.files.push(ContentFile {
                path: path.clone(),
                base,
            });
        } else {
            result.merge(scan_directory(path, manifest));
        }
    }

    result
}
