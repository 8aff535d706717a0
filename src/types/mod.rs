//! Core domain types for snippets.
//!
//! This module contains the values that flow between the parser, the
//! registry and the handlers:
//! - `ParsedValue` - scalar, sequence or mapping attribute values
//! - `ParamSpec` - a handler's declared parameter
//! - `BoundArguments` - values aligned with a handler's parameters

mod args;
mod params;
mod value;

pub use args::{BindFailure, BoundArguments};
pub use params::ParamSpec;
pub use value::{Mapping, ParsedValue};
