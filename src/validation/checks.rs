//! Individual checks.
//!
//! Document checks work on an `Expander::inspect` report; config checks
//! work on the manifest's template snippets.

use std::collections::{HashMap, HashSet};

use crate::discovery::Manifest;
use crate::expand::DocumentReport;
use crate::snippets::placeholders;

use super::warning::{Diagnostic, ValidationResult};

/// Openings that never find their closing parenthesis.
pub fn check_unterminated(report: &DocumentReport) -> ValidationResult {
    let mut result = ValidationResult::new();

    for tag in &report.unterminated {
        result.push(
            Diagnostic::warning(
                "snippets::unterminated",
                format!("'({}:' is never closed and will be left as written", tag.tag),
            )
            .with_help("Add a closing ')' or escape the parenthesis inside the value with '\\'")
            .at(tag.location),
        );
    }

    result
}

/// Argument values that failed to parse.
pub fn check_values(report: &DocumentReport) -> ValidationResult {
    let mut result = ValidationResult::new();

    for tag in &report.tags {
        for failure in &tag.failures {
            result.push(
                Diagnostic::warning(
                    "snippets::value",
                    format!(
                        "Value for '{}' in '{}' could not be parsed: {}",
                        failure.param, tag.handler, failure.error
                    ),
                )
                .with_help(format!(
                    "'{}' is ignored; quote the value or escape special characters with '\\'",
                    failure.raw
                ))
                .at(tag.location),
            );
        }
    }

    result
}

/// Template snippets must declare a non-empty list of unique parameters.
pub fn check_template_params(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (name, def) in &manifest.snippets {
        if def.params.is_empty() {
            result.push(
                Diagnostic::error(
                    "snippets::params",
                    format!("Snippet '{}' declares no parameters", name),
                )
                .with_help("List the snippet's parameters under 'params'"),
            );
            continue;
        }

        let mut seen = HashSet::new();
        for param in &def.params {
            if !seen.insert(param.to_ascii_lowercase()) {
                result.push(Diagnostic::error(
                    "snippets::params",
                    format!("Snippet '{}' declares parameter '{}' twice", name, param),
                ));
            }
        }

        for key in def.defaults.keys() {
            if !def.params.contains(key) {
                result.push(
                    Diagnostic::warning(
                        "snippets::defaults",
                        format!("Snippet '{}' has a default for unknown parameter '{}'", name, key),
                    )
                    .with_help("Add the parameter to 'params' or remove the default"),
                );
            }
        }
    }

    result
}

/// Snippet names that differ only in case.
///
/// Tags match case-insensitively, so a differently cased tag can only
/// reach one of them.
pub fn check_snippet_names(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen: HashMap<String, &str> = HashMap::new();

    for name in manifest.snippets.keys() {
        match seen.get(&name.to_ascii_lowercase()) {
            Some(first) => result.push(
                Diagnostic::warning(
                    "snippets::names",
                    format!("Snippets '{}' and '{}' differ only in case", first, name),
                )
                .with_help(format!(
                    "Tags such as '({}:' resolve to '{}'",
                    name.to_ascii_uppercase(),
                    first
                )),
            ),
            None => {
                seen.insert(name.to_ascii_lowercase(), name);
            }
        }
    }

    result
}

/// Template placeholders must name declared parameters.
pub fn check_template_placeholders(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (name, def) in &manifest.snippets {
        for placeholder in placeholders(&def.template) {
            if !def.params.contains(&placeholder) {
                result.push(
                    Diagnostic::error(
                        "snippets::template",
                        format!(
                            "Template of '{}' uses '{{{}}}', which is not a parameter",
                            name, placeholder
                        ),
                    )
                    .with_help(format!("Declared parameters: {}", def.params.join(", "))),
                );
            }
        }
    }

    result
}
