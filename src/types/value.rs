//! Parsed snippet attribute values.
//!
//! Every raw attribute in a tag is parsed into a `ParsedValue`:
//! - `Scalar` - a plain or quoted string (`hello`, `'a, b'`)
//! - `Sequence` - an ordered list (`[a, b, c]`)
//! - `Mapping` - an ordered map with unique keys (`{x: 1, y: 2}`)

use std::collections::HashMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    Scalar(String),
    Sequence(Vec<ParsedValue>),
    Mapping(Mapping),
}

impl ParsedValue {
    /// Create a scalar value.
    pub fn scalar(value: impl Into<String>) -> Self {
        ParsedValue::Scalar(value.into())
    }

    /// Borrow the string of a scalar value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParsedValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ParsedValue]> {
        match self {
            ParsedValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ParsedValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ParsedValue::Scalar(_))
    }

    /// Whether a user-provided value means "yes".
    ///
    /// Only scalars can be true: `yes`, `true` or `1`, ignoring case and
    /// surrounding whitespace.
    pub fn is_true(&self) -> bool {
        match self {
            ParsedValue::Scalar(s) => {
                let s = s.trim().to_ascii_lowercase();
                matches!(s.as_str(), "yes" | "true" | "1")
            }
            _ => false,
        }
    }

    /// Whether the value counts as blank when building output.
    ///
    /// Blank values are the empty string, `0`, `false` and empty collections.
    pub fn is_blank(&self) -> bool {
        match self {
            ParsedValue::Scalar(s) => s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"),
            ParsedValue::Sequence(items) => items.is_empty(),
            ParsedValue::Mapping(map) => map.is_empty(),
        }
    }

    /// Flatten the value into display text.
    ///
    /// Scalars are returned verbatim, collections are joined with `, `
    /// (mappings contribute their values). Nested collections flatten into
    /// the same list; an empty one contributes an empty item.
    pub fn to_text(&self) -> String {
        if let ParsedValue::Scalar(s) = self {
            return s.clone();
        }

        let mut parts: Vec<&str> = Vec::new();
        let mut pending = vec![self];
        while let Some(value) = pending.pop() {
            match value {
                ParsedValue::Scalar(s) => parts.push(s),
                ParsedValue::Sequence(items) if items.is_empty() => parts.push(""),
                ParsedValue::Sequence(items) => pending.extend(items.iter().rev()),
                ParsedValue::Mapping(map) if map.is_empty() => parts.push(""),
                ParsedValue::Mapping(map) => {
                    pending.extend(map.entries.iter().rev().map(|(_, v)| v))
                }
            }
        }
        parts.join(", ")
    }

    fn take_children(&mut self, into: &mut Vec<ParsedValue>) {
        match self {
            ParsedValue::Scalar(_) => {}
            ParsedValue::Sequence(items) => into.append(items),
            ParsedValue::Mapping(map) => {
                map.index.clear();
                into.extend(map.entries.drain(..).map(|(_, v)| v));
            }
        }
    }
}

// Values nest as deep as the input allows, so children are dropped from a
// heap stack instead of by recursion.
impl Drop for ParsedValue {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            value.take_children(&mut pending);
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for ParsedValue {
    fn from(value: &str) -> Self {
        ParsedValue::Scalar(value.to_string())
    }
}

impl From<String> for ParsedValue {
    fn from(value: String) -> Self {
        ParsedValue::Scalar(value)
    }
}

impl Serialize for ParsedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParsedValue::Scalar(s) => serializer.serialize_str(s),
            ParsedValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ParsedValue::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

/// An insertion-ordered map with unique string keys.
///
/// Inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mapping {
    entries: Vec<(String, ParsedValue)>,
    /// Key to position in `entries`.
    index: HashMap<String, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: ParsedValue) -> Option<ParsedValue> {
        let key = key.into();
        if let Some(&position) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&ParsedValue> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParsedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &ParsedValue> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl FromIterator<(String, ParsedValue)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, ParsedValue)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_insert_keeps_position() {
        let mut map = Mapping::new();
        map.insert("a", "1".into());
        map.insert("b", "2".into());
        let old = map.insert("a", "3".into());

        assert_eq!(old, Some(ParsedValue::scalar("1")));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&ParsedValue::scalar("3")));
    }

    #[test]
    fn test_is_true() {
        assert!(ParsedValue::scalar("yes").is_true());
        assert!(ParsedValue::scalar(" TRUE ").is_true());
        assert!(ParsedValue::scalar("1").is_true());
        assert!(!ParsedValue::scalar("no").is_true());
        assert!(!ParsedValue::Sequence(vec!["yes".into()]).is_true());
    }

    #[test]
    fn test_is_blank() {
        assert!(ParsedValue::scalar("").is_blank());
        assert!(ParsedValue::scalar("0").is_blank());
        assert!(ParsedValue::scalar("false").is_blank());
        assert!(ParsedValue::Sequence(vec![]).is_blank());
        assert!(!ParsedValue::scalar("x").is_blank());
    }

    #[test]
    fn test_to_text_flattens_collections() {
        let seq = ParsedValue::Sequence(vec!["a".into(), "b".into()]);
        assert_eq!(seq.to_text(), "a, b");

        let map: Mapping = vec![("k".to_string(), ParsedValue::scalar("v"))]
            .into_iter()
            .collect();
        assert_eq!(ParsedValue::Mapping(map).to_text(), "v");
    }

    #[test]
    fn test_to_text_flattens_nested_collections() {
        let nested = ParsedValue::Sequence(vec![
            "a".into(),
            ParsedValue::Sequence(vec!["b".into(), ParsedValue::Sequence(vec![])]),
            "c".into(),
        ]);
        assert_eq!(nested.to_text(), "a, b, , c");
    }

    #[test]
    fn test_deeply_nested_value_drops() {
        let mut value = ParsedValue::scalar("leaf");
        for depth in 0..200_000 {
            value = if depth % 2 == 0 {
                ParsedValue::Sequence(vec![value])
            } else {
                ParsedValue::Mapping(vec![("k".to_string(), value)].into_iter().collect())
            };
        }
        assert_eq!(value.to_text(), "leaf");
        drop(value);
    }

    #[test]
    fn test_mapping_lookup_after_many_inserts() {
        let map: Mapping = (0..10_000)
            .map(|i| (format!("k{}", i), ParsedValue::scalar(i.to_string())))
            .collect();
        assert_eq!(map.len(), 10_000);
        assert_eq!(map.get("k9999"), Some(&ParsedValue::scalar("9999")));
        assert_eq!(map.keys().next(), Some("k0"));
    }

    #[test]
    fn test_serialize_json() {
        let mut map = Mapping::new();
        map.insert("x", "1".into());
        map.insert("y", ParsedValue::Sequence(vec!["a".into()]));
        let json = serde_json::to_string(&ParsedValue::Mapping(map)).unwrap();
        assert_eq!(json, r#"{"x":"1","y":["a"]}"#);
    }
}
