//! Checks for documents and project configuration.
//!
//! Reports problems that expansion silently tolerates: tags that are
//! never closed, values that fail to parse, and template snippets that
//! reference parameters they do not declare. Used by `snippets check`.

mod checks;
mod warning;

use std::path::Path;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::discovery::Manifest;
use crate::expand::Expander;
use crate::output::{display_path, plural, Printer};

/// Check one document against the registry behind `expander`.
pub fn validate_document(expander: &Expander<'_>, content: &str) -> ValidationResult {
    let report = expander.inspect(content);

    let mut result = ValidationResult::new();
    result.merge(checks::check_unterminated(&report));
    result.merge(checks::check_values(&report));
    result.sort_by_location();
    result
}

/// Check the template snippets of a manifest.
pub fn validate_config(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.merge(checks::check_snippet_names(manifest));
    result.merge(checks::check_template_params(manifest));
    result.merge(checks::check_template_placeholders(manifest));
    result
}

/// Print diagnostics for one source to stderr.
pub fn print_diagnostics(result: &ValidationResult, source: &Path, printer: &Printer) {
    let source = display_path(source);

    for d in result.iter() {
        let position = match d.location {
            Some(location) => format!("{}:{}", source, location),
            None => source.clone(),
        };
        eprintln!(
            "{}[{}]: {}",
            printer.severity(&d.severity.to_string(), d.severity == Severity::Error),
            d.code,
            d.message
        );
        eprintln!("  {} {}", printer.dim("-->"), printer.cyan(&position));
        if let Some(help) = &d.help {
            eprintln!("  {} {}", printer.dim("help:"), help);
        }
    }
}

/// Print the closing summary line for a check run.
pub fn print_summary(errors: usize, warnings: usize, printer: &Printer) {
    let counts = format!(
        "{}, {}",
        plural(errors, "error", "errors"),
        plural(warnings, "warning", "warnings")
    );

    if errors > 0 {
        printer.error("Failed", &counts);
    } else if warnings > 0 {
        printer.warning("Checked", &counts);
    } else {
        printer.success("Checked", "no problems found");
    }
}
