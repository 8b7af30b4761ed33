//! Conversion of JSON and YAML text into `Value` trees.
//!
//! Parsing itself is delegated to `serde_json` and `serde_yaml`; this module
//! maps their value types onto ours, keeping integers apart from floats.
//!
//! # Example
//!
//! ```
//! use pathquill::document::parser::parse_json;
//! use pathquill::document::value::Value;
//!
//! let value = parse_json(r#"{"name": "Alice", "age": 30}"#).unwrap();
//! assert_eq!(value.get_key("age"), Some(&Value::Int(30)));
//! ```

use super::value::{Map, Value};
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

/// Parses a JSON document.
pub fn parse_json(content: &str) -> Result<Value> {
    let parsed: JsonValue = serde_json::from_str(content).context("Failed to parse JSON")?;
    Ok(parse_value(&parsed))
}

/// Parses a YAML document. Only the first document of a stream is read.
pub fn parse_yaml(content: &str) -> Result<Value> {
    let parsed: YamlValue = serde_yaml::from_str(content).context("Failed to parse YAML")?;
    Ok(from_yaml_value(&parsed))
}

/// Reads a command-line style literal: JSON if it parses, otherwise the text
/// itself as a string.
///
/// ```
/// use pathquill::document::parser::parse_literal;
/// use pathquill::document::value::Value;
///
/// assert_eq!(parse_literal("42"), Value::Int(42));
/// assert_eq!(parse_literal("Bingo"), Value::from("Bingo"));
/// assert_eq!(parse_literal("\"42\""), Value::from("42"));
/// ```
pub fn parse_literal(text: &str) -> Value {
    match serde_json::from_str::<JsonValue>(text) {
        Ok(parsed) => parse_value(&parsed),
        Err(_) => Value::String(text.to_string()),
    }
}

/// Converts a `serde_json` value.
pub fn parse_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(parse_value).collect()),
        JsonValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), parse_value(v)))
                .collect::<Map>(),
        ),
    }
}

/// Converts a `serde_yaml` value.
///
/// Non-string mapping keys are rendered as text and tags are dropped.
pub fn from_yaml_value(value: &YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::Array(items.iter().map(from_yaml_value).collect()),
        YamlValue::Mapping(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (yaml_key(k), from_yaml_value(v)))
                .collect::<Map>(),
        ),
        YamlValue::Tagged(tagged) => from_yaml_value(&tagged.value),
    }
}

fn yaml_key(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
