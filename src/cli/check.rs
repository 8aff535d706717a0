//! Check command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{scan_paths, scan_sources, MANIFEST_FILENAME};
use crate::error::{Result, SnippetError};
use crate::expand::Expander;
use crate::output::{display_path, plural, Printer};
use crate::validation::{print_diagnostics, print_summary, validate_config, validate_document};

use super::Project;

/// Report unterminated tags, bad values and broken templates
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check (default: sources from snippets.yaml)
    pub paths: Vec<PathBuf>,

    /// Fail on warnings too
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CheckArgs, config: Option<&Path>, printer: &Printer) -> Result<()> {
    let project = Project::load(config)?;
    let mut errors = 0;
    let mut warnings = 0;

    if project.has_manifest {
        let config_path = config
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project.root.join(MANIFEST_FILENAME));
        let result = validate_config(&project.manifest);
        print_diagnostics(&result, &config_path, printer);
        errors += result.error_count();
        warnings += result.warning_count();
    }

    let registry = project.manifest.registry(&project.root);
    let expander = Expander::new(&registry)?;

    let scan = if args.paths.is_empty() {
        scan_sources(
            &project.manifest.effective_sources(),
            &project.root,
            &project.manifest,
        )
    } else {
        scan_paths(&args.paths, &project.manifest)
    };

    for file in &scan.files {
        let content = fs::read_to_string(&file.path).map_err(|e| SnippetError::Io {
            path: file.path.clone(),
            message: format!("Failed to read file: {}", e),
        })?;
        let result = validate_document(&expander, &content);
        log::debug!("{}: {} diagnostic(s)", display_path(&file.path), result.len());
        print_diagnostics(&result, &file.path, printer);
        errors += result.error_count();
        warnings += result.warning_count();
    }

    printer.info("Scanned", &plural(scan.total(), "document", "documents"));
    print_summary(errors, warnings, printer);

    if errors > 0 || (args.strict && warnings > 0) {
        return Err(SnippetError::Validation {
            message: format!(
                "{}, {}",
                plural(errors, "error", "errors"),
                plural(warnings, "warning", "warnings")
            ),
            help: Some("Fix the problems listed above".to_string()),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn check(paths: Vec<PathBuf>, config: Option<&Path>, strict: bool) -> Result<()> {
        run(CheckArgs { paths, strict }, config, &Printer::plain())
    }

    #[test]
    fn test_clean_documents_pass() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "(link: https://x.com)").unwrap();
        assert!(check(vec![dir.path().to_path_buf()], None, false).is_ok());
    }

    #[test]
    fn test_warnings_fail_only_when_strict() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "(link: https://x.com").unwrap();

        assert!(check(vec![dir.path().to_path_buf()], None, false).is_ok());
        let err = check(vec![dir.path().to_path_buf()], None, true).unwrap_err();
        assert!(matches!(err, SnippetError::Validation { .. }));
    }

    #[test]
    fn test_broken_template_fails() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("snippets.yaml");
        fs::write(
            &config,
            "snippets:\n  note:\n    params: [text]\n    template: \"{missing}\"\n",
        )
        .unwrap();

        assert!(check(vec![], Some(&config), false).is_err());
    }
}
