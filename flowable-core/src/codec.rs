//! Variable codec
//!
//! The engine hands variables to workers either as an object keyed by name
//! (`{"name": {"type": .., "value": ..}}`) or as an array of
//! `{"name", "type", "value"}` entries. Handlers work with a flat list of
//! [`HandlerVariable`] regardless of which encoding arrived.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::domain::handler::HandlerVariable;

/// Key holding the variables inside a job document
const VARIABLES_KEY: &str = "variables";

/// Errors raised while decoding a job body
#[derive(Debug, Error)]
pub enum CodecError {
    /// The body is not a JSON object
    #[error("invalid job body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Extracts the variables carried by a job document
///
/// A body without a `variables` key yields an empty list. A `variables` value
/// that is neither an object nor an array is returned as a single `json`
/// variable named `variables`.
pub fn decode_variables(body: &str) -> Result<Vec<HandlerVariable>, CodecError> {
    let data: Map<String, Value> = serde_json::from_str(body)?;

    let Some(raw) = data.get(VARIABLES_KEY) else {
        return Ok(Vec::new());
    };

    let variables = match raw {
        Value::Object(vars) => vars
            .iter()
            .map(|(name, value)| decode_named(name, value))
            .collect(),
        Value::Array(items) => items.iter().filter_map(decode_element).collect(),
        other => vec![HandlerVariable::new(VARIABLES_KEY, "json", other.clone())],
    };

    Ok(variables)
}

/// Entry of the object encoding: either `{type, value}` or a bare value
fn decode_named(name: &str, value: &Value) -> HandlerVariable {
    match value {
        Value::Object(entry) => HandlerVariable::new(
            name,
            str_field(entry, "type").unwrap_or_default(),
            entry.get("value").cloned().unwrap_or(Value::Null),
        ),
        bare => HandlerVariable::new(name, "", bare.clone()),
    }
}

/// Entry of the array encoding; `id` stands in for a missing `name`
fn decode_element(item: &Value) -> Option<HandlerVariable> {
    let entry = item.as_object()?;
    let name = str_field(entry, "name").or_else(|| str_field(entry, "id"))?;

    Some(HandlerVariable::new(
        name,
        str_field(entry, "type").unwrap_or_default(),
        entry.get("value").cloned().unwrap_or(Value::Null),
    ))
}

fn str_field<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Returns the first variable named `name` rendered as a string
///
/// Strings pass through, integral numbers drop their fractional part, booleans
/// print as `true`/`false` and anything else is re-encoded as JSON. A missing
/// variable yields an empty string.
pub fn get_var(vars: &[HandlerVariable], name: &str) -> String {
    let Some(var) = vars.iter().find(|v| v.name == name) else {
        return String::new();
    };

    match &var.value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn by_name(vars: Vec<HandlerVariable>) -> HashMap<String, HandlerVariable> {
        vars.into_iter().map(|v| (v.name.clone(), v)).collect()
    }

    #[test]
    fn test_decode_object_format() {
        let body = r#"{"variables":{"foo":{"value":"bar","type":"string"},"num":{"value":42,"type":"number"}}}"#;
        let vars = by_name(decode_variables(body).unwrap());

        assert_eq!(vars.len(), 2);
        assert_eq!(vars["foo"].value, json!("bar"));
        assert_eq!(vars["foo"].var_type, "string");
        assert!(vars["num"].value.is_number());
    }

    #[test]
    fn test_decode_object_bare_value_has_empty_type() {
        let vars = decode_variables(r#"{"variables":{"flag":true}}"#).unwrap();
        assert_eq!(vars, vec![HandlerVariable::new("flag", "", true)]);
    }

    #[test]
    fn test_decode_array_format() {
        let body = r#"{"variables":[{"name":"a","type":"string","value":"x"},{"name":"b","type":"number","value":5}]}"#;
        let vars = by_name(decode_variables(body).unwrap());

        assert_eq!(vars.len(), 2);
        assert_eq!(vars["a"].value, json!("x"));
        assert_eq!(vars["b"].value, json!(5));
    }

    #[test]
    fn test_decode_array_falls_back_to_id_and_skips_unnamed() {
        let body = r#"{"variables":[{"id":"byId","type":"string","value":"v"},{"type":"string","value":"orphan"},7]}"#;
        let vars = decode_variables(body).unwrap();

        assert_eq!(vars, vec![HandlerVariable::new("byId", "string", "v")]);
    }

    #[test]
    fn test_object_and_array_encodings_agree() {
        let object = r#"{"variables":{"a":{"type":"string","value":"x"},"b":{"type":"integer","value":5}}}"#;
        let array = r#"{"variables":[{"name":"b","type":"integer","value":5},{"name":"a","type":"string","value":"x"}]}"#;

        assert_eq!(
            by_name(decode_variables(object).unwrap()),
            by_name(decode_variables(array).unwrap())
        );
    }

    #[test]
    fn test_decode_other_shape_wrapped() {
        let vars = decode_variables(r#"{"variables":"raw"}"#).unwrap();
        assert_eq!(vars, vec![HandlerVariable::new("variables", "json", "raw")]);
    }

    #[test]
    fn test_decode_no_variables() {
        let vars = decode_variables(r#"{"foo":"bar"}"#).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(decode_variables(r#"{"variables":"#).is_err());
        assert!(decode_variables("[1,2]").is_err());
    }

    #[test]
    fn test_get_var_string() {
        let vars = vec![HandlerVariable::new("s", "string", "hello")];
        assert_eq!(get_var(&vars, "s"), "hello");
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_get_var_numbers() {
        let vars = vec![
            HandlerVariable::new("n", "number", 5.0),
            HandlerVariable::new("f", "number", 3.14),
            HandlerVariable::new("i", "integer", 42),
        ];
        assert_eq!(get_var(&vars, "n"), "5");
        assert_eq!(get_var(&vars, "f"), "3.14");
        assert_eq!(get_var(&vars, "i"), "42");
    }

    #[test]
    fn test_get_var_bool() {
        let vars = vec![HandlerVariable::new("b", "boolean", true)];
        assert_eq!(get_var(&vars, "b"), "true");
    }

    #[test]
    fn test_get_var_object_reencoded() {
        let vars = vec![HandlerVariable::new("o", "json", json!({"k": "v"}))];
        assert_eq!(get_var(&vars, "o"), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_get_var_first_match_wins() {
        let vars = vec![
            HandlerVariable::new("dup", "string", "first"),
            HandlerVariable::new("dup", "string", "second"),
        ];
        assert_eq!(get_var(&vars, "dup"), "first");
    }

    #[test]
    fn test_get_var_missing() {
        let vars = vec![HandlerVariable::new("x", "string", "y")];
        assert_eq!(get_var(&vars, "nope"), "");
    }
}
