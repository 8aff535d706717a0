//! Tag scanning.
//!
//! Finds every `(name:` opening for the registered tag names and pairs it
//! with its closing parenthesis. The closing `)` is the first one that is
//! neither escaped with `\` nor inside a double-quoted string.

use regex::Regex;

use crate::error::{Result, SnippetError};

/// One tag located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOccurrence {
    /// Tag name as written (`youtube-popup`, `LINK`, ...).
    pub tag: String,
    /// Tag name with dashes turned into underscores.
    pub name: String,
    /// The whole tag including its delimiters.
    pub full_span: String,
    /// Text between `(name:` and the closing `)`, trimmed.
    pub raw_arguments: String,
    /// Byte offset of the opening `(`.
    pub start: usize,
    /// Byte offset one past the closing `)`.
    pub end: usize,
}

/// An opening delimiter without a matching `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedTag {
    pub tag: String,
    /// Byte offset of the opening `(`.
    pub start: usize,
}

/// Result of scanning a document.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Terminated tags in document order.
    pub occurrences: Vec<TagOccurrence>,
    /// Openings that ran to the end of the document.
    pub unterminated: Vec<UnterminatedTag>,
}

/// Locates tag occurrences for a fixed set of names.
#[derive(Debug, Clone)]
pub struct TagScanner {
    pattern: Option<Regex>,
}

impl TagScanner {
    /// Build a scanner for the given tag names.
    ///
    /// Names containing `_` are also matched with `-` in its place.
    /// Matching is case-insensitive.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut alternatives: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() {
                continue;
            }
            alternatives.push(regex::escape(name));
            if name.contains('_') {
                alternatives.push(regex::escape(&name.replace('_', "-")));
            }
        }

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        // Longest first so a name never shadows a longer one sharing its prefix
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();

        let source = format!(r"(?i)\(({})\s*:", alternatives.join("|"));
        let pattern = Regex::new(&source).map_err(|e| SnippetError::Parse {
            message: format!("Failed to build tag pattern: {}", e),
            help: Some("Check registered snippet names".to_string()),
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Scan `content` for tag occurrences.
    pub fn scan(&self, content: &str) -> ScanResult {
        let mut result = ScanResult::default();
        let Some(pattern) = &self.pattern else {
            return result;
        };

        for caps in pattern.captures_iter(content) {
            let (Some(opening), Some(tag)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let Some(close) = find_closing(content, opening.end()) else {
                log::debug!(
                    "unterminated tag '{}' at byte {}",
                    tag.as_str(),
                    opening.start()
                );
                result.unterminated.push(UnterminatedTag {
                    tag: tag.as_str().to_string(),
                    start: opening.start(),
                });
                continue;
            };

            result.occurrences.push(TagOccurrence {
                tag: tag.as_str().to_string(),
                name: normalize_tag_name(tag.as_str()),
                full_span: content[opening.start()..close + 1].to_string(),
                raw_arguments: raw_arguments(&content[opening.end()..close]).to_string(),
                start: opening.start(),
                end: close + 1,
            });
        }

        result
    }
}

/// Trim the argument text and drop a doubled closing `)` left behind by
/// an escaped one (`(tag: a\))`).
fn raw_arguments(text: &str) -> &str {
    text.trim().trim_end_matches(')')
}

/// Map a dash synonym back to its underscore form.
pub fn normalize_tag_name(tag: &str) -> String {
    tag.replace('-', "_")
}

/// Find the byte offset of the closing `)` at or after `from`.
///
/// A backslash escapes the following byte; `"` toggles a quoted region in
/// which `)` does not count.
pub fn find_closing(content: &str, from: usize) -> Option<usize> {
    let mut escaped = false;
    let mut quoted = false;

    for (i, &b) in content.as_bytes().iter().enumerate().skip(from) {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'"' => quoted = !quoted,
            b')' if !quoted => return Some(i),
            _ => {}
        }
    }

    None
}
