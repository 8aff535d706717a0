//! Expand command implementation.
//!
//! Expands documents to stdout or into an output directory that mirrors
//! the source layout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use clap::Args;

use crate::discovery::{scan_paths, scan_sources, ContentFile};
use crate::error::{Result, SnippetError};
use crate::expand::Expander;
use crate::output::{display_path, plural, Printer};

use super::Project;

/// Expand snippets in documents
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Files or directories to expand, or `-` for stdin
    /// (default: sources from snippets.yaml)
    pub paths: Vec<PathBuf>,

    /// Output directory (default: `output` from snippets.yaml)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// URL prefix for links to internal files
    #[arg(long)]
    pub base_url: Option<String>,
}

pub fn run(args: ExpandArgs, config: Option<&Path>, printer: &Printer) -> Result<()> {
    let mut project = Project::load(config)?;
    if let Some(base_url) = &args.base_url {
        project.manifest.base_url = Some(base_url.clone());
    }

    let registry = project.manifest.registry(&project.root);
    let expander = Expander::new(&registry)?;

    if args.paths.len() == 1 && args.paths[0] == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return write_stdout(&expander.expand(&content)?);
    }

    if args.output.is_none() && args.paths.len() == 1 && args.paths[0].is_file() {
        let path = &args.paths[0];
        return write_stdout(&expand_file(&expander, path)?);
    }

    let scan = if args.paths.is_empty() {
        scan_sources(
            &project.manifest.effective_sources(),
            &project.root,
            &project.manifest,
        )
    } else {
        scan_paths(&args.paths, &project.manifest)
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| project.root.join(&project.manifest.output));

    for file in &scan.files {
        if is_inside(&file.path, &output) {
            log::debug!("skipping {} inside the output directory", file.path.display());
            continue;
        }
        printer.status("Expanding", &display_path(&file.path));
        let expanded = expand_file(&expander, &file.path).inspect_err(|_| {
            printer.error("Failed", &display_path(&file.path));
        })?;
        write_output(&output, file, &expanded)?;
    }

    printer.success(
        "Finished",
        &format!(
            "{} to {}",
            plural(scan.total(), "document", "documents"),
            display_path(&output)
        ),
    );

    Ok(())
}

fn expand_file(expander: &Expander<'_>, path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| SnippetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;
    expander.expand(&content)
}

fn write_output(output: &Path, file: &ContentFile, content: &str) -> Result<()> {
    let target = output.join(file.relative());
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| SnippetError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    fs::write(&target, content).map_err(|e| SnippetError::Io {
        path: target.clone(),
        message: format!("Failed to write file: {}", e),
    })
}

/// Whether `path` lies under `dir`. Both sides are canonicalized when they
/// exist; otherwise `.` components are ignored.
fn is_inside(path: &Path, dir: &Path) -> bool {
    match (fs::canonicalize(path), fs::canonicalize(dir)) {
        (Ok(path), Ok(dir)) => path.starts_with(dir),
        _ => without_cur_dir(path).starts_with(without_cur_dir(dir)),
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_expand_into_output_directory() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("blog")).unwrap();
        fs::write(content.join("index.md"), "Call (tel: 555)").unwrap();
        fs::write(content.join("blog/post.md"), "```\n(tel: 1)\n```").unwrap();

        let out = dir.path().join("out");
        let args = ExpandArgs {
            paths: vec![content],
            output: Some(out.clone()),
            base_url: None,
        };
        run(args, None, &Printer::plain()).unwrap();

        assert_eq!(
            fs::read_to_string(out.join("index.md")).unwrap(),
            "Call <a href='tel:555'>555</a>"
        );
        assert_eq!(
            fs::read_to_string(out.join("blog/post.md")).unwrap(),
            "```\n(tel: 1)\n```"
        );
    }

    #[test]
    fn test_expand_uses_config_templates() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("snippets.yaml");
        fs::write(
            &config,
            "sources: [docs]\noutput: public\nsnippets:\n  shout:\n    params: [text]\n    template: \"<b>{text}</b>\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/a.md"), "(shout: hey)").unwrap();

        let args = ExpandArgs {
            paths: vec![],
            output: None,
            base_url: None,
        };
        run(args, Some(&config), &Printer::plain()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("public/a.md")).unwrap(),
            "<b>hey</b>"
        );
    }

    #[test]
    fn test_output_directory_is_not_expanded_again() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "(tel: 1)").unwrap();

        for _ in 0..2 {
            let args = ExpandArgs {
                paths: vec![dir.path().to_path_buf()],
                output: Some(dir.path().join("dist")),
                base_url: None,
            };
            run(args, None, &Printer::plain()).unwrap();
        }

        assert!(dir.path().join("dist/a.md").exists());
        assert!(!dir.path().join("dist/dist").exists());
    }

    #[test]
    fn test_is_inside_ignores_cur_dir() {
        assert!(is_inside(Path::new("./dist/a.md"), Path::new("dist")));
        assert!(is_inside(Path::new("dist/a.md"), Path::new("./dist")));
        assert!(!is_inside(Path::new("./docs/a.md"), Path::new("dist")));
    }

    #[test]
    fn test_is_inside_resolves_parent_components() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/a.md"), "").unwrap();

        assert!(is_inside(
            &dir.path().join("dist/a.md"),
            &dir.path().join("docs/../dist")
        ));
    }

    #[test]
    fn test_expand_missing_file_errors() {
        let dir = tempdir().unwrap();
        let registry = crate::registry::Registry::defaults();
        let expander = Expander::new(&registry).unwrap();
        let result = expand_file(&expander, &dir.path().join("missing.md"));
        assert!(matches!(result, Err(SnippetError::Io { .. })));
    }
}
