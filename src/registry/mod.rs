//! Snippet registry.
//!
//! Maps tag names to their handlers. Registration happens once, through a
//! `RegistryBuilder`: the default snippets first, then configured ones, so
//! a later registration for the same name replaces an earlier one.
//!
//! # Example
//!
//! ```ignore
//! use snippets::registry::{HandlerEntry, RegistryBuilder};
//! use snippets::types::ParamSpec;
//!
//! let mut builder = RegistryBuilder::with_defaults();
//! builder.add(HandlerEntry::new(
//!     "shout",
//!     vec![ParamSpec::required("text")],
//!     |args| Ok(args.text_or_empty("text").to_uppercase()),
//! ));
//! let registry = builder.build();
//! ```

mod handler;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::parser::{bind_arguments, normalize_tag_name};
use crate::snippets::DefaultSnippets;
use crate::types::{BoundArguments, ParamSpec};

pub use handler::{HandlerEntry, HandlerFn, Registration, SnippetBundle};

/// Tag name to handler lookup.
///
/// The registry is immutable after construction - use `RegistryBuilder`
/// to create a new one. It can be shared across threads.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    handlers: BTreeMap<String, HandlerEntry>,
}

impl Registry {
    /// Registry holding only the default snippets.
    pub fn defaults() -> Self {
        RegistryBuilder::with_defaults().build()
    }

    /// Find the handler for a tag name.
    ///
    /// Tries the name as written, then with dashes turned into
    /// underscores, then ignoring ASCII case. Names that differ only in
    /// case resolve to the first one in sorted order.
    pub fn lookup(&self, name: &str) -> Option<&HandlerEntry> {
        if let Some(entry) = self.handlers.get(name) {
            return Some(entry);
        }

        let normalized = normalize_tag_name(name);
        if let Some(entry) = self.handlers.get(&normalized) {
            return Some(entry);
        }

        self.handlers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&normalized))
            .map(|(_, entry)| entry)
    }

    /// Invoke a handler. Its output is returned verbatim.
    pub fn invoke(&self, entry: &HandlerEntry, args: &BoundArguments) -> Result<String> {
        log::trace!("invoking '{}'", entry.name);
        entry.call(args)
    }

    /// Look up, bind and invoke in one step.
    ///
    /// Returns `None` when no handler answers to `name`.
    pub fn dispatch(&self, name: &str, raw_arguments: &str) -> Option<Result<String>> {
        let entry = self.lookup(name)?;
        let args = bind_arguments(&entry.params, raw_arguments);
        Some(self.invoke(entry, &args))
    }

    /// All registered tag names, sorted.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|s| s.as_str())
    }

    /// All registered handlers.
    pub fn entries(&self) -> impl Iterator<Item = &HandlerEntry> {
        self.handlers.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Builder for constructing a `Registry`.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    handlers: BTreeMap<String, HandlerEntry>,
}

impl RegistryBuilder {
    /// Create an empty registry builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-loaded with the default snippets.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.add_bundle(&DefaultSnippets::default());
        builder
    }

    /// Add a single handler or a bundle. Later entries win.
    pub fn add(&mut self, registration: impl Into<Registration>) -> &mut Self {
        for entry in registration.into().into_entries() {
            if self.handlers.contains_key(&entry.name) {
                log::debug!("snippet '{}' overrides an earlier registration", entry.name);
            }
            self.handlers.insert(entry.name.clone(), entry);
        }
        self
    }

    /// Add a handler from a closure.
    pub fn add_handler<F>(&mut self, name: &str, params: Vec<ParamSpec>, handler: F) -> &mut Self
    where
        F: Fn(&BoundArguments) -> Result<String> + Send + Sync + 'static,
    {
        self.add(HandlerEntry::new(name, params, handler))
    }

    /// Add every handler of a bundle.
    pub fn add_bundle(&mut self, bundle: &dyn SnippetBundle) -> &mut Self {
        self.add(Registration::bundle(bundle))
    }

    /// Whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Finish registration.
    pub fn build(self) -> Registry {
        Registry {
            handlers: self.handlers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnippetError;
    use crate::types::ParsedValue;

    fn echo(name: &str) -> HandlerEntry {
        let label = name.to_string();
        HandlerEntry::new(name, vec![ParamSpec::required("value")], move |args| {
            Ok(format!("{}:{}", label, args.text_or_empty("value")))
        })
    }

    #[test]
    fn test_empty_registry() {
        let registry = RegistryBuilder::new().build();
        assert!(registry.is_empty());
        assert!(registry.lookup("link").is_none());
    }

    #[test]
    fn test_defaults_registered() {
        let registry = Registry::defaults();
        for name in [
            "link", "email", "tel", "image", "file", "youtube", "vimeo", "twitter", "gist",
        ] {
            assert!(registry.contains(name), "missing default snippet {}", name);
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut builder = RegistryBuilder::with_defaults();
        builder.add_handler("link", vec![ParamSpec::required("url")], |_| {
            Ok("custom".to_string())
        });
        let registry = builder.build();

        let entry = registry.lookup("link").unwrap();
        assert_eq!(entry.params.len(), 1);
        assert_eq!(registry.dispatch("link", "x").unwrap().unwrap(), "custom");
    }

    #[test]
    fn test_lookup_synonym_and_case() {
        let mut builder = RegistryBuilder::new();
        builder.add(echo("youtube_popup"));
        let registry = builder.build();

        assert!(registry.lookup("youtube-popup").is_some());
        assert!(registry.lookup("YouTube-Popup").is_some());
        assert!(registry.lookup("youtube").is_none());
    }

    #[test]
    fn test_case_insensitive_lookup_is_deterministic() {
        let mut builder = RegistryBuilder::new();
        builder.add(echo("note"));
        builder.add(echo("Note"));
        let registry = builder.build();

        assert_eq!(registry.dispatch("note", "a").unwrap().unwrap(), "note:a");
        assert_eq!(registry.dispatch("Note", "a").unwrap().unwrap(), "Note:a");
        for _ in 0..8 {
            assert_eq!(registry.dispatch("NOTE", "a").unwrap().unwrap(), "Note:a");
        }
        assert_eq!(registry.tag_names().collect::<Vec<_>>(), vec!["Note", "note"]);
    }

    #[test]
    fn test_dispatch_binds_arguments() {
        let mut builder = RegistryBuilder::new();
        builder.add(echo("say"));
        let registry = builder.build();

        assert_eq!(registry.dispatch("say", "hello").unwrap().unwrap(), "say:hello");
        assert!(registry.dispatch("unknown", "x").is_none());
    }

    #[test]
    fn test_invoke_propagates_errors() {
        let mut builder = RegistryBuilder::new();
        builder.add_handler("fail", vec![], |_| {
            Err(SnippetError::Handler {
                tag: "fail".to_string(),
                message: "boom".to_string(),
            })
        });
        let registry = builder.build();

        let result = registry.dispatch("fail", "");
        assert!(matches!(result, Some(Err(SnippetError::Handler { .. }))));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();

        let registry = std::sync::Arc::new(Registry::defaults());
        let handle = {
            let registry = registry.clone();
            std::thread::spawn(move || registry.dispatch("tel", "123").map(|r| r.is_ok()))
        };
        assert_eq!(handle.join().unwrap(), Some(true));
        assert!(registry.lookup("tel").is_some());
    }

    #[test]
    fn test_default_values_reach_handler() {
        let mut builder = RegistryBuilder::new();
        builder.add_handler(
            "size",
            vec![ParamSpec::required("name"), ParamSpec::with_default("width", "480")],
            |args| Ok(args.value("width").map(ParsedValue::to_text).unwrap_or_default()),
        );
        let registry = builder.build();
        assert_eq!(registry.dispatch("size", "x").unwrap().unwrap(), "480");
    }
}
