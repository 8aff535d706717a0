//! Init command implementation.
//!
//! Writes a starter `snippets.yaml` listing the directories that hold
//! Markdown content.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{scan_directory, Manifest, MANIFEST_FILENAME};
use crate::error::{Result, SnippetError};
use crate::output::{display_path, plural, Printer};

/// Example template snippet, commented out.
const EXAMPLE_SNIPPET: &str = "\
# snippets:
#   note:
#     description: Callout box
#     params: [text, class]
#     defaults: { class: note }
#     template: \"<aside class='{class}'>{text}</aside>\"
";

/// Create a starter snippets.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing snippets.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(SnippetError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let scan = scan_directory(&args.path, &Manifest::default());
    let source_dirs = source_dirs(&args.path, scan.files.iter().map(|f| f.path.as_path()));

    let yaml = render_manifest(&source_dirs);
    fs::write(&manifest_path, yaml).map_err(|e| SnippetError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    if !source_dirs.is_empty() {
        let dirs: Vec<&str> = source_dirs.iter().map(String::as_str).collect();
        printer.info("Discovered", &dirs.join(", "));
    }
    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(scan.total(), "document", "documents")
        ),
    );

    Ok(())
}

/// Top-level directories holding content, relative to `root`.
fn source_dirs<'a>(root: &Path, files: impl Iterator<Item = &'a Path>) -> BTreeSet<String> {
    files
        .filter_map(|file| file.strip_prefix(root).ok())
        .map(|relative| match relative.components().next() {
            Some(first) if relative.components().count() > 1 => {
                format!("{}/", first.as_os_str().to_string_lossy())
            }
            _ => ".".to_string(),
        })
        .collect()
}

fn render_manifest(source_dirs: &BTreeSet<String>) -> String {
    let mut yaml = String::new();

    if !(source_dirs.is_empty() || (source_dirs.len() == 1 && source_dirs.contains("."))) {
        yaml.push_str("sources:\n");
        for dir in source_dirs {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }

    yaml.push_str("output: dist\n");
    yaml.push_str("excludes:\n  - \"dist/*\"\n");
    yaml.push_str("# base_url: https://example.com\n");
    yaml.push_str("# root: public\n");
    yaml.push_str(EXAMPLE_SNIPPET);
    yaml
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn init(path: &Path, force: bool) -> Result<()> {
        let args = InitArgs {
            path: path.to_path_buf(),
            force,
        };
        run(args, &Printer::plain())
    }

    #[test]
    fn test_init_creates_parsable_manifest() {
        let dir = tempdir().unwrap();
        init(dir.path(), false).unwrap();

        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        assert!(!content.contains("sources:"));

        let manifest = Manifest::parse(&content).unwrap();
        assert_eq!(manifest.output, PathBuf::from("dist"));
        assert!(manifest.snippets.is_empty());
    }

    #[test]
    fn test_init_errors_if_manifest_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "output: build").unwrap();
        assert!(init(dir.path(), false).is_err());
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "output: build").unwrap();
        init(dir.path(), true).unwrap();

        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        assert!(content.contains("output: dist"));
    }

    #[test]
    fn test_init_discovers_source_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("content/blog")).unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("content/blog/post.md"), "post").unwrap();
        fs::write(dir.path().join("pages/about.md"), "about").unwrap();

        init(dir.path(), false).unwrap();

        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        let manifest = Manifest::parse(&content).unwrap();
        assert_eq!(manifest.sources, vec!["content/", "pages/"]);
    }
}
