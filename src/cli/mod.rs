pub mod check;
pub mod completions;
pub mod expand;
pub mod init;
pub mod list;
pub mod parse;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::discovery::{load_manifest, Manifest};
use crate::error::Result;

/// snippets - expand inline (tag: ...) snippets in Markdown content
#[derive(Parser, Debug)]
#[command(name = "snippets")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to snippets.yaml (default: ./snippets.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand snippets in documents
    Expand(expand::ExpandArgs),

    /// Report unterminated tags, bad values and broken templates
    Check(check::CheckArgs),

    /// List the available snippets
    List(list::ListArgs),

    /// Parse a single attribute value and print it as JSON
    Parse(parse::ParseArgs),

    /// Create a starter snippets.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// A project: its root directory and configuration.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub manifest: Manifest,
    pub has_manifest: bool,
}

impl Project {
    /// Load the project the CLI is running in.
    ///
    /// The root is the directory holding the config file, or the working
    /// directory when no config is given.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let root = config
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (manifest, has_manifest) = load_manifest(&root, config)?;
        Ok(Self {
            root,
            manifest,
            has_manifest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["snippets", "list", "-v", "--config", "site/snippets.yaml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/snippets.yaml")));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_project_root_from_config() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("snippets.yaml");
        fs::write(&config, "output: public").unwrap();

        let project = Project::load(Some(&config)).unwrap();
        assert!(project.has_manifest);
        assert_eq!(project.root, dir.path());
        assert_eq!(project.manifest.output, PathBuf::from("public"));
    }
}
