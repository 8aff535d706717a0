//! HTML attribute building.

use crate::types::ParsedValue;

/// Render `name='value'` attributes with a leading space.
///
/// Blank values (absent, empty, `0`, `false`, empty collections) are
/// skipped. Sequences are joined with spaces; mappings expand into their
/// own attributes. Returns an empty string when nothing is rendered.
pub fn html_attributes<'a, I>(attributes: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a ParsedValue>)>,
{
    // Mappings splice their entries in place, so pending work is a stack
    let mut pending: Vec<(&str, &ParsedValue)> = attributes
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect();
    pending.reverse();

    let mut parts = Vec::new();
    while let Some((name, value)) = pending.pop() {
        if value.is_blank() {
            continue;
        }

        match value {
            ParsedValue::Scalar(s) => parts.push(attribute(name, s)),
            ParsedValue::Sequence(items) => {
                let joined: Vec<String> = items
                    .iter()
                    .filter(|v| !v.is_blank())
                    .map(ParsedValue::to_text)
                    .collect();
                parts.push(attribute(name, &joined.join(" ")));
            }
            ParsedValue::Mapping(map) => {
                let entries: Vec<_> = map.iter().collect();
                pending.extend(entries.into_iter().rev());
            }
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" {}", parts.join(" "))
    }
}

fn attribute(name: &str, value: &str) -> String {
    format!("{}='{}'", name, escape(value))
}

/// Escape text for use inside a quoted attribute.
pub fn escape(value: &str) -> String {
    html_escape::encode_quoted_attribute(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mapping;

    #[test]
    fn test_skips_blank_values() {
        let title = ParsedValue::scalar("Hi");
        let empty = ParsedValue::scalar("");
        let zero = ParsedValue::scalar("0");
        let attrs = html_attributes([
            ("title", Some(&title)),
            ("class", None),
            ("alt", Some(&empty)),
            ("width", Some(&zero)),
        ]);
        assert_eq!(attrs, " title='Hi'");
    }

    #[test]
    fn test_nothing_rendered() {
        assert_eq!(html_attributes([("class", None)]), "");
    }

    #[test]
    fn test_values_escaped() {
        let title = ParsedValue::scalar("it's <b>");
        let attrs = html_attributes([("title", Some(&title))]);
        assert_eq!(attrs, " title='it&#x27;s &lt;b&gt;'");
    }

    #[test]
    fn test_sequence_joined() {
        let class = ParsedValue::Sequence(vec![
            ParsedValue::scalar("a"),
            ParsedValue::scalar("b"),
        ]);
        assert_eq!(html_attributes([("class", Some(&class))]), " class='a b'");
    }

    #[test]
    fn test_mapping_expands() {
        let data: Mapping = [
            ("data-x".to_string(), ParsedValue::scalar("1")),
            ("data-y".to_string(), ParsedValue::scalar("")),
        ]
        .into_iter()
        .collect();
        let value = ParsedValue::Mapping(data);
        assert_eq!(html_attributes([("extra", Some(&value))]), " data-x='1'");
    }

    #[test]
    fn test_nested_mapping_expands_in_order() {
        let inner: Mapping = [
            ("data-y".to_string(), ParsedValue::scalar("2")),
            ("data-z".to_string(), ParsedValue::scalar("0")),
        ]
        .into_iter()
        .collect();
        let outer: Mapping = [
            ("data-x".to_string(), ParsedValue::scalar("1")),
            ("inner".to_string(), ParsedValue::Mapping(inner)),
            ("data-w".to_string(), ParsedValue::scalar("3")),
        ]
        .into_iter()
        .collect();
        let value = ParsedValue::Mapping(outer);
        let title = ParsedValue::scalar("t");

        assert_eq!(
            html_attributes([("extra", Some(&value)), ("title", Some(&title))]),
            " data-x='1' data-y='2' data-w='3' title='t'"
        );
    }
}
