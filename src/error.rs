use miette::Diagnostic;
use thiserror::Error;

/// Main error type for snippet operations
#[derive(Error, Diagnostic, Debug)]
pub enum SnippetError {
    #[error("IO error: {0}")]
    #[diagnostic(code(snippets::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(snippets::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(snippets::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(snippets::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Check failed: {message}")]
    #[diagnostic(code(snippets::check))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Snippet '{tag}' failed: {message}")]
    #[diagnostic(code(snippets::handler))]
    Handler { tag: String, message: String },
}

pub type Result<T> = std::result::Result<T, SnippetError>;
