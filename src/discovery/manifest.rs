//! Project configuration (snippets.yaml) parsing.
//!
//! The manifest holds site settings used by link fix-ups, the default
//! inputs and output of `snippets expand`, and template snippets that
//! extend or override the built-in ones.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnippetError};
use crate::registry::{Registry, RegistryBuilder};
use crate::snippets::{template_entry, DefaultSnippets, SiteLinks, TemplateDef};

/// Project configuration loaded from snippets.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Prefix for links to internal files.
    pub base_url: Option<String>,

    /// Directory internal files are resolved under, relative to the
    /// project root.
    pub root: Option<PathBuf>,

    /// Source directories to expand. Defaults to the project root.
    pub sources: Vec<String>,

    /// Output directory for expanded documents.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// File extensions treated as content.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,

    /// Template snippets, keyed by tag name.
    pub snippets: BTreeMap<String, TemplateDef>,
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            base_url: None,
            root: None,
            sources: vec![],
            output: default_output(),
            extensions: default_extensions(),
            excludes: vec![],
            snippets: BTreeMap::new(),
        }
    }
}

impl Manifest {
    /// Load a manifest from a snippets.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SnippetError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse a manifest from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SnippetError::Config {
            message: format!("Invalid config: {}", e),
            help: Some("Check snippets.yaml syntax".to_string()),
        })
    }

    /// Whether a path matches one of the exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().replace('\\', "/");
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path, pattern))
    }

    /// Whether a path has one of the content extensions.
    pub fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Source paths, defaulting to the current directory.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }

    /// Link settings, with `root` resolved against the project directory.
    pub fn site_links(&self, project_root: &Path) -> SiteLinks {
        let root = match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => project_root.join(root),
            None => project_root.to_path_buf(),
        };
        SiteLinks::new(self.base_url.clone(), Some(root))
    }

    /// Register the template snippets on top of whatever `builder` holds.
    pub fn apply(&self, builder: &mut RegistryBuilder) {
        for (name, def) in &self.snippets {
            log::debug!("registering template snippet '{}'", name);
            builder.add(template_entry(name, def));
        }
    }

    /// Build the registry for a project: defaults, then templates.
    pub fn registry(&self, project_root: &Path) -> Registry {
        let mut builder = RegistryBuilder::new();
        builder.add_bundle(&DefaultSnippets::new(self.site_links(project_root)));
        self.apply(&mut builder);
        builder.build()
    }
}

/// Simple glob matching for exclude patterns.
///
/// Supports `*.ext`, `dir/*`, `**/dir/*`, `**/name` and plain substrings.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
        }
        return path.ends_with(suffix) || path.contains(suffix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
    }

    path.contains(pattern)
}
