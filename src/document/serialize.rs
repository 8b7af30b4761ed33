//! Rendering `Value` trees as JSON or YAML text.
//!
//! Object keys are written in sorted order unless the caller asks for
//! insertion order. Non-finite floats have no JSON or YAML representation
//! here and make serialization fail.
//!
//! # Example
//!
//! ```
//! use pathquill::document::serialize::to_canonical_json;
//! use pathquill::document::value::Value;
//!
//! let value: Value = vec![("b", Value::from(1)), ("a", Value::from(true))]
//!     .into_iter()
//!     .collect();
//! assert_eq!(
//!     to_canonical_json(&value, 2).unwrap(),
//!     "{\n  \"a\": true,\n  \"b\": 1\n}"
//! );
//! ```

use super::value::Value;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Serialized JSON is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Output shape shared by the JSON and YAML writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Spaces per indentation level. Zero writes compact JSON.
    pub indent: usize,
    pub sort_keys: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            sort_keys: true,
        }
    }
}

/// Borrowed view of a value that serializes with the given key order.
struct Ordered<'a> {
    value: &'a Value,
    sort_keys: bool,
}

impl<'a> Ordered<'a> {
    fn child(&self, value: &'a Value) -> Self {
        Ordered {
            value,
            sort_keys: self.sort_keys,
        }
    }
}

impl Serialize for Ordered<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float(f) => Err(S::Error::custom(format!(
                "cannot serialize non-finite number {}",
                f
            ))),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
                if self.sort_keys {
                    entries.sort_by(|a, b| a.0.cmp(b.0));
                }
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, &self.child(value))?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Value {
    /// Serializes with sorted keys.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Ordered {
            value: self,
            sort_keys: true,
        }
        .serialize(serializer)
    }
}

/// Key-sorted JSON with `indent` spaces per level.
pub fn to_canonical_json(value: &Value, indent: usize) -> Result<String, SerializeError> {
    to_json_string(
        value,
        SerializeOptions {
            indent,
            sort_keys: true,
        },
    )
}

pub fn to_json_string(value: &Value, options: SerializeOptions) -> Result<String, SerializeError> {
    let ordered = Ordered {
        value,
        sort_keys: options.sort_keys,
    };

    if options.indent == 0 {
        return Ok(serde_json::to_string(&ordered)?);
    }

    let indent = " ".repeat(options.indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    ordered.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// YAML text. `serde_yaml` fixes the indentation, so only key order is
/// configurable.
pub fn to_yaml_string(value: &Value, sort_keys: bool) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(&Ordered { value, sort_keys })?)
}
