//! List command implementation.

use std::path::Path;

use clap::Args;
use serde::Serialize;

use crate::error::Result;
use crate::output::Printer;
use crate::registry::{HandlerEntry, Registry};
use crate::types::ParsedValue;

use super::Project;

/// List the available snippets
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SnippetInfo<'a> {
    name: &'a str,
    description: Option<&'a str>,
    params: Vec<ParamInfo<'a>>,
}

#[derive(Debug, Serialize)]
struct ParamInfo<'a> {
    name: &'a str,
    required: bool,
    default: Option<&'a ParsedValue>,
}

impl<'a> From<&'a HandlerEntry> for SnippetInfo<'a> {
    fn from(entry: &'a HandlerEntry) -> Self {
        Self {
            name: &entry.name,
            description: entry.description.as_deref(),
            params: entry
                .params
                .iter()
                .map(|p| ParamInfo {
                    name: &p.name,
                    required: !p.has_default,
                    default: p.default.as_ref(),
                })
                .collect(),
        }
    }
}

pub fn run(args: ListArgs, config: Option<&Path>, printer: &Printer) -> Result<()> {
    let project = Project::load(config)?;
    let registry = project.manifest.registry(&project.root);

    if args.json {
        println!("{}", render_json(&registry)?);
    } else {
        for entry in sorted_entries(&registry) {
            match &entry.description {
                Some(description) => println!(
                    "{}  {}",
                    printer.bold(&entry.signature()),
                    printer.dim(description)
                ),
                None => println!("{}", printer.bold(&entry.signature())),
            }
        }
    }

    Ok(())
}

fn sorted_entries(registry: &Registry) -> Vec<&HandlerEntry> {
    let mut entries: Vec<&HandlerEntry> = registry.entries().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

fn render_json(registry: &Registry) -> Result<String> {
    let infos: Vec<SnippetInfo> = sorted_entries(registry)
        .into_iter()
        .map(SnippetInfo::from)
        .collect();
    serde_json::to_string_pretty(&infos).map_err(|e| crate::error::SnippetError::Parse {
        message: format!("Failed to serialize snippet list: {}", e),
        help: None,
    })
}
