//! Parsing of inline snippet tags.
//!
//! A tag looks like `(name: first value, key: value, other: [a, b])`. This
//! module provides the pieces needed to turn one into handler arguments:
//!
//! - [`FenceGuard`] hides fenced code regions from the scanner
//! - [`TagScanner`] locates tags and their raw argument text
//! - [`bind_arguments`] aligns raw arguments with declared parameters
//! - [`ValueParser`] parses a single raw value into a `ParsedValue`
//!
//! # Usage
//!
//! ```ignore
//! use snippets::parser::{bind_arguments, TagScanner};
//!
//! let scanner = TagScanner::new(["link"])?;
//! for occurrence in scanner.scan("(link: https://x.com, text: X)").occurrences {
//!     let args = bind_arguments(&params, &occurrence.raw_arguments);
//! }
//! ```

mod binder;
mod fence;
mod scanner;
pub mod span;
mod value;

pub use binder::bind_arguments;
pub use fence::FenceGuard;
pub use scanner::{
    find_closing, normalize_tag_name, ScanResult, TagOccurrence, TagScanner, UnterminatedTag,
};
pub use span::{offset_to_location, Location};
pub use value::{ValueError, ValueParser};
