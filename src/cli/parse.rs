//! Parse command implementation.
//!
//! Shows how a single attribute value is understood, which helps when a
//! value with brackets, quotes or escapes does not bind as expected.

use clap::Args;

use crate::error::{Result, SnippetError};
use crate::parser::{ValueError, ValueParser};
use crate::types::ParsedValue;

/// Parse a single attribute value and print it as JSON
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// The raw value, e.g. "{alt: A cat, class: [wide, framed]}"
    pub value: String,

    /// Print on one line
    #[arg(long)]
    pub compact: bool,
}

pub fn run(args: ParseArgs) -> Result<()> {
    let value = parse_value(&args.value)?;
    println!("{}", to_json(&value, args.compact)?);
    Ok(())
}

fn parse_value(raw: &str) -> Result<ParsedValue> {
    ValueParser::parse(raw).map_err(|e| SnippetError::Parse {
        message: e.to_string(),
        help: Some(hint(raw, &e)),
    })
}

fn hint(raw: &str, error: &ValueError) -> String {
    let pointer = |offset: usize| format!("{}\n{}^", raw, " ".repeat(offset));
    match error {
        ValueError::Empty => "Pass a non-empty value".to_string(),
        ValueError::UnexpectedToken { offset, .. } => pointer(*offset),
        ValueError::UnterminatedQuote { offset } => {
            format!("{}\nClose the quote or escape it with '\\'", pointer(*offset))
        }
        ValueError::UnterminatedArray { offset } => {
            format!("{}\nAdd the matching ']' or '}}'", pointer(*offset))
        }
    }
}

fn to_json(value: &ParsedValue, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| SnippetError::Parse {
        message: format!("Failed to serialize value: {}", e),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(raw: &str) -> String {
        to_json(&parse_value(raw).unwrap(), true).unwrap()
    }

    #[test]
    fn test_scalar() {
        assert_eq!(compact("'a, b'"), r#""a, b""#);
    }

    #[test]
    fn test_nested() {
        assert_eq!(
            compact("{alt: A cat, class: [wide, framed]}"),
            r#"{"alt":"A cat","class":["wide","framed"]}"#
        );
    }

    #[test]
    fn test_mixed_array_keys() {
        assert_eq!(compact("[a, x: 1, b]"), r#"{"0":"a","x":"1","1":"b"}"#);
    }

    #[test]
    fn test_error_points_at_offset() {
        let err = parse_value("[a, 'b").unwrap_err();
        match err {
            SnippetError::Parse { help: Some(help), .. } => {
                assert!(help.starts_with("[a, 'b\n    ^"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
