//! Handler entries and registrations.
//!
//! A handler is a named callable plus its declared parameter table. The
//! table stands in for signature introspection: the binder only knows a
//! handler's parameters through it.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{BoundArguments, ParamSpec};

/// The callable behind a snippet.
pub type HandlerFn = dyn Fn(&BoundArguments) -> Result<String> + Send + Sync;

/// A registered snippet handler.
#[derive(Clone)]
pub struct HandlerEntry {
    /// Tag name the handler answers to.
    pub name: String,
    /// Declared parameters, in call order.
    pub params: Vec<ParamSpec>,
    /// Short human-readable summary.
    pub description: Option<String>,
    handler: Arc<HandlerFn>,
}

impl HandlerEntry {
    pub fn new<F>(name: impl Into<String>, params: Vec<ParamSpec>, handler: F) -> Self
    where
        F: Fn(&BoundArguments) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            description: None,
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Call the handler with arguments bound to this entry's parameters.
    pub fn call(&self, args: &BoundArguments) -> Result<String> {
        (self.handler)(args)
    }

    /// Parameter list rendered as a call signature: `link(link, text?, width=480)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| match (&p.default, p.has_default) {
                (Some(default), _) => format!("{}={}", p.name, default),
                (None, true) => format!("{}?", p.name),
                (None, false) => p.name.clone(),
            })
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A group of handlers registered together.
///
/// Every entry a bundle returns becomes a tag named after the entry.
pub trait SnippetBundle {
    fn entries(&self) -> Vec<HandlerEntry>;
}

/// Something that can be added to a registry.
#[derive(Debug, Clone)]
pub enum Registration {
    Single(HandlerEntry),
    Bundle(Vec<HandlerEntry>),
}

impl Registration {
    /// Collect a bundle's entries.
    pub fn bundle(bundle: &dyn SnippetBundle) -> Self {
        Registration::Bundle(bundle.entries())
    }

    pub fn into_entries(self) -> Vec<HandlerEntry> {
        match self {
            Registration::Single(entry) => vec![entry],
            Registration::Bundle(entries) => entries,
        }
    }
}

impl From<HandlerEntry> for Registration {
    fn from(entry: HandlerEntry) -> Self {
        Registration::Single(entry)
    }
}
