//! Handler parameter declarations.
//!
//! Handlers declare their formal parameters up front, in call order. The
//! binder uses the names to recognise `name:` keywords and the defaults to
//! fill in anything the tag leaves out.

use super::value::ParsedValue;

/// A single formal parameter of a snippet handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name, also the keyword used in tags (`name:`).
    pub name: String,
    /// Whether the parameter declares a default (possibly an absent one).
    pub has_default: bool,
    /// Default value used when the tag omits the parameter.
    pub default: Option<ParsedValue>,
}

impl ParamSpec {
    /// A parameter without a default.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_default: false,
            default: None,
        }
    }

    /// A parameter whose default is the absent value.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_default: true,
            default: None,
        }
    }

    /// A parameter with a concrete default.
    pub fn with_default(name: impl Into<String>, default: impl Into<ParsedValue>) -> Self {
        Self {
            name: name.into(),
            has_default: true,
            default: Some(default.into()),
        }
    }
}
