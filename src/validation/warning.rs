//! Diagnostic types for check results.

use std::fmt;

use serde::Serialize;

use crate::parser::Location;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code (e.g. "snippets::unterminated").
    pub code: String,
    pub message: String,
    /// Suggestion for fixing the issue.
    pub help: Option<String>,
    /// Where in the document the issue is, for document checks.
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            help: None,
            location: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Collects diagnostics from checks.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// No diagnostics at all.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Order diagnostics by position in the document.
    pub fn sort_by_location(&mut self) {
        self.diagnostics
            .sort_by_key(|d| d.location.map(|l| l.offset).unwrap_or(0));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = ValidationResult::new();
        assert!(result.is_ok());
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_counts() {
        let mut result = ValidationResult::new();
        result.push(Diagnostic::error("snippets::template", "bad"));
        result.push(Diagnostic::warning("snippets::value", "odd"));
        result.push(Diagnostic::warning("snippets::value", "odder"));

        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 2);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_sort_by_location() {
        let mut result = ValidationResult::new();
        result.push(Diagnostic::warning("b", "later").at(Location::new(20, 2, 1)));
        result.push(Diagnostic::warning("a", "earlier").at(Location::new(3, 1, 4)));
        result.sort_by_location();

        let codes: Vec<&str> = result.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "b"]);
    }

    #[test]
    fn test_diagnostic_builders() {
        let d = Diagnostic::error("snippets::params", "no params")
            .with_help("Declare at least one parameter")
            .at(Location::new(0, 1, 1));
        assert_eq!(d.help.as_deref(), Some("Declare at least one parameter"));
        assert_eq!(d.location.map(|l| l.line), Some(1));
    }

    #[test]
    fn test_serializes_lowercase_severity() {
        let d = Diagnostic::warning("snippets::value", "x");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["location"], serde_json::Value::Null);
    }
}
