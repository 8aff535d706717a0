//! Argument binding.
//!
//! Aligns the raw argument text of a tag with a handler's declared
//! parameters. The value right after the tag name always belongs to the
//! first parameter; every other parameter is addressed as `name: value`.
//!
//! ```text
//! (link: https://x.com, title: Hi)
//!        ^^^^^^^^^^^^^  ^^^^^^^^^
//!        params[0]      keyword for params[2]
//! ```

use crate::types::{BindFailure, BoundArguments, ParamSpec, ParsedValue};

use super::value::ValueParser;

/// A `name:` keyword found in the raw arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Keyword {
    /// Index into the parameter list.
    param: usize,
    /// Byte offset of the keyword name.
    start: usize,
    /// Byte offset just past the `:`.
    value_start: usize,
}

/// Bind raw tag arguments to `params`.
///
/// Values that fail to parse are recorded in the result's failures and
/// fall back to the parameter's default. Parameters the tag does not
/// mention get their default, or `None` when they have none.
pub fn bind_arguments(params: &[ParamSpec], raw: &str) -> BoundArguments {
    let raw = raw.replace(['\r', '\n'], " ");

    let segments: Vec<(usize, &str)> = match params.len() {
        0 => Vec::new(),
        1 => vec![(0, raw.as_str())],
        _ => split_segments(params, &raw),
    };

    let mut bound: Vec<Option<ParsedValue>> = vec![None; params.len()];
    let mut provided = vec![false; params.len()];
    let mut failures = Vec::new();

    for (index, text) in segments {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match ValueParser::parse(text) {
            Ok(value) => {
                bound[index] = Some(trim_scalar(value));
                provided[index] = true;
            }
            Err(error) => {
                log::debug!(
                    "could not parse value for '{}': {}",
                    params[index].name,
                    error
                );
                failures.push(BindFailure {
                    param: params[index].name.clone(),
                    raw: text.to_string(),
                    error,
                });
            }
        }
    }

    let values = params
        .iter()
        .zip(bound.into_iter().zip(provided))
        .map(|(param, (value, provided))| {
            if provided {
                value
            } else {
                param.default.clone()
            }
        })
        .collect();

    BoundArguments::new(params, values, failures)
}

fn trim_scalar(mut value: ParsedValue) -> ParsedValue {
    if let ParsedValue::Scalar(s) = &mut value {
        *s = s.trim().to_string();
    }
    value
}

/// Split `raw` into `(param index, value text)` pairs.
///
/// The text before the first keyword pairs with parameter 0. A keyword
/// used twice keeps its last value.
fn split_segments<'a>(params: &[ParamSpec], raw: &'a str) -> Vec<(usize, &'a str)> {
    let keywords = find_keywords(params, raw);

    let leading_end = keywords.first().map(|k| k.start).unwrap_or(raw.len());
    let mut segments = vec![(0, &raw[..leading_end])];

    for (i, keyword) in keywords.iter().enumerate() {
        let end = keywords.get(i + 1).map(|k| k.start).unwrap_or(raw.len());
        log::trace!("keyword '{}' at byte {}", params[keyword.param].name, keyword.start);
        segments.push((keyword.param, &raw[keyword.value_start..end]));
    }

    segments
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Locate top-level `name:` keywords for `params[1..]`.
///
/// Matching ignores case. A keyword must not be glued to a preceding
/// identifier (`subtitle:` is not `title:`), and must not sit inside an
/// unclosed `{...}` or `[...]`.
fn find_keywords(params: &[ParamSpec], raw: &str) -> Vec<Keyword> {
    let bytes = raw.as_bytes();
    let mut keywords = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if i > 0 && is_identifier_byte(bytes[i - 1]) {
            i += 1;
            continue;
        }

        let found = params
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, p)| {
                let name = p.name.as_bytes();
                let end = i + name.len();
                !name.is_empty()
                    && end < bytes.len()
                    && bytes[i..end].eq_ignore_ascii_case(name)
                    && bytes[end] == b':'
            })
            .max_by_key(|(_, p)| p.name.len());

        match found {
            Some((param, p)) if !inside_structure(&raw[i..]) => {
                let value_start = i + p.name.len() + 1;
                keywords.push(Keyword {
                    param,
                    start: i,
                    value_start,
                });
                i = value_start;
            }
            _ => i += 1,
        }
    }

    keywords
}

/// Whether `rest` closes a brace or bracket before opening one.
fn inside_structure(rest: &str) -> bool {
    closes_before_opens(rest, '{', '}') || closes_before_opens(rest, '[', ']')
}

fn closes_before_opens(rest: &str, open: char, close: char) -> bool {
    for c in rest.chars() {
        if c == open {
            return false;
        }
        if c == close {
            return true;
        }
    }
    false
}
