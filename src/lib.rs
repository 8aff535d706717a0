//! snippets - inline snippet expansion for Markdown content
//!
//! Replaces tags such as `(link: example.com, text: Example)` or
//! `(youtube: https://www.youtube.com/watch?v=id, width: 640)` with the
//! HTML their handlers produce. Fenced code blocks are left alone.
//!
//! ```ignore
//! use snippets::{expand, Registry};
//!
//! let html = expand(&Registry::defaults(), "Call (tel: 555 0100)")?;
//! ```

pub mod cli;
pub mod discovery;
pub mod error;
pub mod expand;
pub mod output;
pub mod parser;
pub mod registry;
pub mod snippets;
pub mod types;
pub mod validation;

pub use discovery::{discover, discover_paths, DiscoveryResult, Manifest, ScanResult};
pub use error::{Result, SnippetError};
pub use expand::{expand, ContentHook, DocumentReport, Expander};
pub use parser::{bind_arguments, FenceGuard, TagOccurrence, TagScanner, ValueError, ValueParser};
pub use registry::{HandlerEntry, Registration, Registry, RegistryBuilder, SnippetBundle};
pub use snippets::{DefaultSnippets, SiteLinks, TemplateDef};
pub use types::{BindFailure, BoundArguments, Mapping, ParamSpec, ParsedValue};
pub use validation::{validate_config, validate_document, Diagnostic, Severity, ValidationResult};
