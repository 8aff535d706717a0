//! Arguments bound to a handler's parameters.

use crate::parser::ValueError;

use super::params::ParamSpec;
use super::value::ParsedValue;

/// A raw attribute value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindFailure {
    /// Parameter the value was meant for.
    pub param: String,
    /// The raw text as written in the tag.
    pub raw: String,
    pub error: ValueError,
}

/// Argument values aligned 1:1 with a handler's declared parameters.
///
/// Each slot holds the parsed value, the parameter's default, or `None`
/// when neither is available.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundArguments {
    names: Vec<String>,
    values: Vec<Option<ParsedValue>>,
    failures: Vec<BindFailure>,
}

impl BoundArguments {
    pub(crate) fn new(
        params: &[ParamSpec],
        values: Vec<Option<ParsedValue>>,
        failures: Vec<BindFailure>,
    ) -> Self {
        debug_assert_eq!(params.len(), values.len());
        Self {
            names: params.iter().map(|p| p.name.clone()).collect(),
            values,
            failures,
        }
    }

    /// Number of slots (always the handler's parameter count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value in the given positional slot.
    pub fn get(&self, index: usize) -> Option<&ParsedValue> {
        self.values.get(index).and_then(|v| v.as_ref())
    }

    /// Value bound to the named parameter.
    pub fn value(&self, name: &str) -> Option<&ParsedValue> {
        let index = self.names.iter().position(|n| n == name)?;
        self.get(index)
    }

    /// Display text of the named parameter, if present.
    pub fn text(&self, name: &str) -> Option<String> {
        self.value(name).map(ParsedValue::to_text)
    }

    /// Display text of the named parameter, empty when absent.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    /// Whether the named parameter holds a "yes" value.
    pub fn is_true(&self, name: &str) -> bool {
        self.value(name).is_some_and(ParsedValue::is_true)
    }

    /// All slots in declared order.
    pub fn values(&self) -> &[Option<ParsedValue>] {
        &self.values
    }

    /// `(name, value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParsedValue>)> {
        self.names
            .iter()
            .zip(&self.values)
            .map(|(n, v)| (n.as_str(), v.as_ref()))
    }

    /// Values that failed to parse while binding.
    pub fn failures(&self) -> &[BindFailure] {
        &self.failures
    }
}
