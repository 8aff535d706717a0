//! Document expansion.
//!
//! One pass over a document:
//!
//! 1. hide fenced code regions
//! 2. scan for every tag occurrence
//! 3. rebuild the text, splicing handler output over accepted occurrences
//! 4. restore the fenced regions
//!
//! Occurrences are accepted left to right. One that starts inside an
//! already accepted occurrence (a tag nested in another's arguments) is
//! dropped, and the enclosing handler receives its text as an argument.

use serde::Serialize;

use crate::error::Result;
use crate::parser::{bind_arguments, offset_to_location, FenceGuard, Location, TagScanner};
use crate::registry::Registry;
use crate::types::BindFailure;

/// Entry point for hosts that transform content before rendering it.
pub trait ContentHook {
    fn on_before_render(&self, content: &str) -> Result<String>;
}

/// Expands snippet tags using a registry.
#[derive(Debug)]
pub struct Expander<'r> {
    registry: &'r Registry,
    scanner: TagScanner,
}

impl<'r> Expander<'r> {
    pub fn new(registry: &'r Registry) -> Result<Self> {
        let scanner = TagScanner::new(registry.tag_names())?;
        Ok(Self { registry, scanner })
    }

    /// Expand every tag in `content`.
    ///
    /// Unterminated tags and tags without a handler are left as written.
    /// A failing handler aborts the document with its error.
    pub fn expand(&self, content: &str) -> Result<String> {
        let (protected, guard) = FenceGuard::protect(content);
        let scan = self.scanner.scan(&protected);

        if scan.occurrences.is_empty() {
            return Ok(content.to_string());
        }

        let mut output = String::with_capacity(protected.len());
        let mut cursor = 0;
        let mut expanded = 0;

        for occurrence in &scan.occurrences {
            if occurrence.start < cursor {
                log::trace!("skipping nested '{}' at byte {}", occurrence.tag, occurrence.start);
                continue;
            }

            let Some(entry) = self.registry.lookup(&occurrence.tag) else {
                log::debug!("no handler for '{}'", occurrence.tag);
                continue;
            };

            let args = bind_arguments(&entry.params, &occurrence.raw_arguments);
            let replacement = self.registry.invoke(entry, &args)?;

            output.push_str(&protected[cursor..occurrence.start]);
            output.push_str(&replacement);
            cursor = occurrence.end;
            expanded += 1;
        }
        output.push_str(&protected[cursor..]);

        log::debug!("expanded {} tag(s)", expanded);
        Ok(guard.restore(&output))
    }

    /// Report the tags in `content` without invoking any handler.
    ///
    /// Offsets refer to the original text.
    pub fn inspect(&self, content: &str) -> DocumentReport {
        let (protected, guard) = FenceGuard::protect(content);
        let scan = self.scanner.scan(&protected);
        let locate = |offset: usize| {
            offset_to_location(content, guard.original_offset(&protected, offset))
        };

        let mut report = DocumentReport::default();
        let mut cursor = 0;

        for occurrence in &scan.occurrences {
            if occurrence.start < cursor {
                continue;
            }
            let Some(entry) = self.registry.lookup(&occurrence.tag) else {
                continue;
            };
            cursor = occurrence.end;

            let args = bind_arguments(&entry.params, &occurrence.raw_arguments);
            report.tags.push(ReportedTag {
                tag: occurrence.tag.clone(),
                handler: entry.name.clone(),
                text: guard.restore(&occurrence.full_span),
                location: locate(occurrence.start),
                failures: args.failures().to_vec(),
            });
        }

        report.unterminated = scan
            .unterminated
            .iter()
            .map(|u| UnterminatedReport {
                tag: u.tag.clone(),
                location: locate(u.start),
            })
            .collect();

        report
    }
}

impl ContentHook for Expander<'_> {
    fn on_before_render(&self, content: &str) -> Result<String> {
        self.expand(content)
    }
}

/// Expand `content` with `registry` in one call.
pub fn expand(registry: &Registry, content: &str) -> Result<String> {
    Expander::new(registry)?.expand(content)
}

/// What [`Expander::inspect`] found in a document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentReport {
    pub tags: Vec<ReportedTag>,
    pub unterminated: Vec<UnterminatedReport>,
}

/// A tag that would be expanded.
#[derive(Debug, Clone, Serialize)]
pub struct ReportedTag {
    /// Tag name as written.
    pub tag: String,
    /// Registered handler name.
    pub handler: String,
    /// Full tag text.
    pub text: String,
    pub location: Location,
    /// Values that failed to parse.
    #[serde(skip)]
    pub failures: Vec<BindFailure>,
}

/// An opening without a closing parenthesis.
#[derive(Debug, Clone, Serialize)]
pub struct UnterminatedReport {
    pub tag: String,
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::types::ParamSpec;
    use pretty_assertions::assert_eq;

    fn registry() -> Registry {
        let mut builder = RegistryBuilder::new();
        builder.add_handler(
            "wrap",
            vec![ParamSpec::required("text"), ParamSpec::optional("tag")],
            |args| {
                let tag = args.text("tag").unwrap_or_else(|| "b".to_string());
                Ok(format!("<{0}>{1}</{0}>", tag, args.text_or_empty("text")))
            },
        );
        builder.add_handler("youtube_popup", vec![ParamSpec::required("id")], |args| {
            Ok(format!("[yt {}]", args.text_or_empty("id")))
        });
        builder.build()
    }

    fn run(content: &str) -> String {
        expand(&registry(), content).unwrap()
    }

    #[test]
    fn test_identity_without_tags() {
        for doc in ["", "plain text", "(not a tag)", "(unknown: x)", "```(wrap: x)```"] {
            assert_eq!(run(doc), doc);
        }
    }

    #[test]
    fn test_expands_tag() {
        assert_eq!(run("Say (wrap: hi) now"), "Say <b>hi</b> now");
    }

    #[test]
    fn test_keyword_argument() {
        assert_eq!(run("(wrap: hi, tag: em)"), "<em>hi</em>");
    }

    #[test]
    fn test_identical_tags_each_expanded() {
        assert_eq!(run("(wrap: a) and (wrap: a)"), "<b>a</b> and <b>a</b>");
    }

    #[test]
    fn test_synonym() {
        assert_eq!(run("(youtube-popup: 42) (youtube_popup: 7)"), "[yt 42] [yt 7]");
    }

    #[test]
    fn test_case_insensitive_tag() {
        assert_eq!(run("(WRAP: x)"), "<b>x</b>");
    }

    #[test]
    fn test_fenced_code_untouched() {
        let doc = "before (wrap: a)\n```\n(wrap: b)\n```\nafter";
        assert_eq!(run(doc), "before <b>a</b>\n```\n(wrap: b)\n```\nafter");
    }

    #[test]
    fn test_unterminated_left_alone() {
        assert_eq!(run("(wrap: a) then (wrap: b"), "<b>a</b> then (wrap: b");
    }

    #[test]
    fn test_nested_tag_is_part_of_outer_arguments() {
        // The inner `)` closes the outer tag
        assert_eq!(run("(wrap: x (wrap: y) z)"), "<b>x (wrap: y</b> z)");
    }

    #[test]
    fn test_quoted_paren() {
        assert_eq!(run("(wrap: \"a (b)\")"), "<b>a (b)</b>");
    }

    #[test]
    fn test_handler_error_propagates() {
        let mut builder = RegistryBuilder::new();
        builder.add_handler("bad", vec![], |_| {
            Err(crate::error::SnippetError::Handler {
                tag: "bad".to_string(),
                message: "nope".to_string(),
            })
        });
        let registry = builder.build();
        assert!(expand(&registry, "(bad: x)").is_err());
    }

    #[test]
    fn test_content_hook() {
        let registry = registry();
        let expander = Expander::new(&registry).unwrap();
        let hook: &dyn ContentHook = &expander;
        assert_eq!(hook.on_before_render("(wrap: z)").unwrap(), "<b>z</b>");
    }

    #[test]
    fn test_empty_registry_is_identity() {
        let registry = RegistryBuilder::new().build();
        assert_eq!(expand(&registry, "(wrap: a)").unwrap(), "(wrap: a)");
    }

    #[test]
    fn test_inspect_reports_locations() {
        let registry = registry();
        let expander = Expander::new(&registry).unwrap();
        let doc = "```\n(x)\n```\nline (wrap: 'open)\n(wrap: b";
        let report = expander.inspect(doc);

        assert_eq!(report.tags.len(), 1);
        assert_eq!(report.tags[0].location.line, 4);
        assert_eq!(report.tags[0].location.column, 6);
        assert_eq!(report.tags[0].failures.len(), 1);

        assert_eq!(report.unterminated.len(), 1);
        assert_eq!(report.unterminated[0].location.line, 5);
    }
}
