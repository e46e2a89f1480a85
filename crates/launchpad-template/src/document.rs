//! Generic YAML documents and shape checks for directive values.
//!
//! Fragments are kept as loosely typed [`Mapping`]s because template authors
//! may add or omit any key. Shapes are only checked when a recognized
//! directive is consumed.

use launchpad_common::error::{LaunchpadError, Result};
use serde_yaml::{Mapping, Sequence, Value};

/// Parses a fragment's text into a top-level mapping.
///
/// Documents that are empty or contain only comments yield an empty mapping.
///
/// # Errors
///
/// Returns [`LaunchpadError::Yaml`] on malformed YAML and
/// [`LaunchpadError::Config`] if the document is not a mapping.
pub fn parse_document(text: &str, origin: &str) -> Result<Mapping> {
    if is_blank(text) {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(text).map_err(|source| LaunchpadError::Yaml {
        origin: origin.to_string(),
        source,
    })?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(LaunchpadError::Config {
            message: format!(
                "{origin}: top level must be a mapping, found {}",
                kind_of(&other)
            ),
        }),
    }
}

/// Serializes a document back to YAML text.
///
/// # Errors
///
/// Returns [`LaunchpadError::Yaml`] if serialization fails.
pub fn render_document(doc: &Mapping, origin: &str) -> Result<String> {
    serde_yaml::to_string(doc).map_err(|source| LaunchpadError::Yaml {
        origin: origin.to_string(),
        source,
    })
}

fn is_blank(text: &str) -> bool {
    text.lines().map(str::trim).all(|l| l.is_empty() || l.starts_with('#'))
}

/// Renders a scalar as text; collections yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Renders any value as text, collections in YAML flow style.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Sequence(seq) => {
            let items: Vec<String> = seq.iter().map(value_text).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let items: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", value_text(k), value_text(v)))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
        Value::Tagged(tagged) => value_text(&tagged.value),
        scalar => scalar_text(scalar).unwrap_or_default(),
    }
}

/// Renders an `env`/`labels` value: falsy values become the empty string.
pub fn coerce_text(value: &Value) -> String {
    if is_falsy(value) {
        return String::new();
    }
    value_text(value)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Bool(true) | Value::Tagged(_) => false,
    }
}

/// Looks up a directive's value as a mapping; `null` counts as empty.
///
/// # Errors
///
/// Returns [`LaunchpadError::InvalidDirective`] for any other shape.
pub fn expect_mapping<'a>(
    directive: &'static str,
    value: &'a Value,
) -> Result<Option<&'a Mapping>> {
    match value {
        Value::Mapping(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(shape_error(directive, "a mapping", other)),
    }
}

/// Looks up a directive's value as a sequence; `null` counts as empty.
///
/// # Errors
///
/// Returns [`LaunchpadError::InvalidDirective`] for any other shape.
pub fn expect_sequence<'a>(
    directive: &'static str,
    value: &'a Value,
) -> Result<Option<&'a Sequence>> {
    match value {
        Value::Sequence(seq) => Ok(Some(seq)),
        Value::Null => Ok(None),
        other => Err(shape_error(directive, "a list", other)),
    }
}

/// Requires a scalar and renders it as text.
///
/// # Errors
///
/// Returns [`LaunchpadError::InvalidDirective`] if the value is a collection.
pub fn expect_scalar(directive: &'static str, value: &Value) -> Result<String> {
    scalar_text(value).ok_or_else(|| shape_error(directive, "a scalar", value))
}

/// Fetches a required field from a nested entry such as `volume.host`.
///
/// # Errors
///
/// Returns [`LaunchpadError::InvalidDirective`] if the field is missing.
pub fn required_field<'a>(
    directive: &'static str,
    entry: &'a Value,
    field: &str,
) -> Result<&'a Value> {
    entry
        .get(field)
        .ok_or_else(|| LaunchpadError::InvalidDirective {
            directive,
            message: format!("entry is missing required field `{field}`"),
        })
}

/// Stringifies a mapping key.
///
/// # Errors
///
/// Returns [`LaunchpadError::InvalidDirective`] for non-scalar keys.
pub fn key_text(directive: &'static str, key: &Value) -> Result<String> {
    scalar_text(key).ok_or_else(|| shape_error(directive, "scalar keys", key))
}

fn shape_error(directive: &'static str, expected: &str, found: &Value) -> LaunchpadError {
    LaunchpadError::InvalidDirective {
        directive,
        message: format!("expected {expected}, found {}", kind_of(found)),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_comment_only_documents_are_empty_mappings() {
        assert!(parse_document("", "empty").expect("parses").is_empty());
        assert!(
            parse_document("# nothing here\n\n", "comments")
                .expect("parses")
                .is_empty()
        );
    }

    #[test]
    fn top_level_list_is_rejected() {
        let err = parse_document("- a\n- b\n", "list.yml").expect_err("not a mapping");
        assert!(err.to_string().contains("list.yml"));
    }

    #[test]
    fn malformed_yaml_names_origin() {
        let err = parse_document("env: [unterminated\n", "web.yml").expect_err("malformed");
        assert!(matches!(err, LaunchpadError::Yaml { ref origin, .. } if origin == "web.yml"));
    }

    #[test]
    fn parse_preserves_key_order() {
        let doc = parse_document("zeta: 1\nalpha: 2\nmid: 3\n", "order").expect("parses");
        let keys: Vec<_> = doc.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn coerce_text_maps_falsy_values_to_empty() {
        assert_eq!(coerce_text(&Value::Null), "");
        assert_eq!(coerce_text(&Value::Bool(false)), "");
        assert_eq!(coerce_text(&Value::from(0)), "");
        assert_eq!(coerce_text(&Value::from("")), "");
        assert_eq!(coerce_text(&Value::Sequence(Vec::new())), "");
        assert_eq!(coerce_text(&Value::Mapping(Mapping::new())), "");
    }

    #[test]
    fn coerce_text_stringifies_non_strings() {
        assert_eq!(coerce_text(&Value::from(8080)), "8080");
        assert_eq!(coerce_text(&Value::Bool(true)), "true");
        assert_eq!(coerce_text(&Value::from(1.5)), "1.5");
    }

    #[test]
    fn collections_render_in_flow_style() {
        let list: Value = serde_yaml::from_str("[a, 2, [x]]").expect("yaml");
        assert_eq!(coerce_text(&list), "[a, 2, [x]]");
        let map: Value = serde_yaml::from_str("{k: v, n: [1]}").expect("yaml");
        assert_eq!(value_text(&map), "{k: v, n: [1]}");
    }

    #[test]
    fn required_field_reports_missing_name() {
        let entry: Value = serde_yaml::from_str("host: /data").expect("yaml");
        let err = required_field("volumes", &entry, "guest").expect_err("missing guest");
        assert!(err.to_string().contains("`guest`"));
    }
}
