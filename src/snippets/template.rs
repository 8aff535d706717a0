//! Template snippets declared in configuration.
//!
//! A template snippet has a parameter list and an output template with
//! `{param}` placeholders:
//!
//! ```yaml
//! note:
//!   params: [text, class]
//!   defaults: { class: note }
//!   template: "<aside class='{class}'>{text}</aside>"
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::registry::HandlerEntry;
use crate::types::{BoundArguments, ParamSpec};

use super::html::escape;

/// A snippet defined by a template instead of code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDef {
    pub description: Option<String>,
    /// Parameter names in call order. The first is the leading value.
    pub params: Vec<String>,
    pub defaults: BTreeMap<String, String>,
    pub template: String,
    /// Substitute values without HTML escaping.
    pub raw: bool,
}

impl TemplateDef {
    /// Parameter table for the binder.
    pub fn param_specs(&self) -> Vec<ParamSpec> {
        self.params
            .iter()
            .enumerate()
            .map(|(i, name)| match self.defaults.get(name) {
                Some(default) => ParamSpec::with_default(name.as_str(), default.as_str()),
                None if i == 0 => ParamSpec::required(name.as_str()),
                None => ParamSpec::optional(name.as_str()),
            })
            .collect()
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_-]*)\}").expect("placeholder pattern is valid")
    })
}

/// Placeholder names used by a template, in order of first use.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_pattern().captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute `{param}` placeholders with bound argument text.
///
/// Declared parameters without a value become empty. Placeholders that
/// name no declared parameter are left as written.
pub fn render_template(template: &str, args: &BoundArguments, raw: bool) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            if !args.iter().any(|(n, _)| n == name) {
                return caps[0].to_string();
            }
            let text = args.text_or_empty(name);
            if raw {
                text
            } else {
                escape(&text)
            }
        })
        .into_owned()
}

/// Build a registry entry for a template snippet.
pub fn template_entry(name: &str, def: &TemplateDef) -> HandlerEntry {
    let template = def.template.clone();
    let raw = def.raw;
    let entry = HandlerEntry::new(name, def.param_specs(), move |args| {
        Ok(render_template(&template, args, raw))
    });

    match &def.description {
        Some(description) => entry.with_description(description.as_str()),
        None => entry,
    }
}
