//! Path-addressed reads and writes on a value tree.
//!
//! Reads never fail: a missing key, an out-of-range index or a kind mismatch
//! at any depth yields `None`. Writes follow the same rule and are silently
//! dropped when the path does not resolve, leaving the tree untouched.
//!
//! In-place writes go through [`apply_change`], which descends through
//! exclusive borrows so that every ancestor observes the change without being
//! rebuilt. The free functions [`set`], [`append`] and [`set_key_value`] clone
//! the root first and return the updated copy.
//!
//! # Example
//!
//! ```
//! use pathquill::document::navigator::{get, set};
//! use pathquill::document::value::Value;
//! use pathquill::path;
//!
//! let students: Value = vec![
//!     vec![("name", Value::from("John")), ("age", Value::from(13))].into_iter().collect::<Value>(),
//!     vec![("name", Value::from("Alex")), ("age", Value::from(12))].into_iter().collect::<Value>(),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(get(&students, &path![1usize, "name"]), Some(&Value::from("Alex")));
//! assert_eq!(get(&students, &path![1usize, "name", "age"]), None);
//!
//! let updated = set(&students, &path![0usize, "name"], Value::from("Tony"));
//! assert_eq!(get(&updated, &path![0usize, "name"]), Some(&Value::from("Tony")));
//! // The original tree is untouched.
//! assert_eq!(get(&students, &path![0usize, "name"]), Some(&Value::from("John")));
//! ```

use super::path::{Path, Segment};
use super::value::Value;
use log::trace;

/// A write applied at the position a path addresses.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Replaces the target. Arrays are concatenated onto arrays and objects
    /// are merged into objects (incoming keys win); any other pairing replaces
    /// the target outright.
    Replace(Value),
    /// Pushes onto the target array.
    Append(Value),
    /// Sets `key` inside the target object.
    SetKeyValue { key: String, value: Value },
}

/// Returns the value at `path`, or `None` if the path does not resolve.
///
/// The empty path resolves to `value` itself.
pub fn get<'a>(value: &'a Value, path: &Path) -> Option<&'a Value> {
    get_segments(value, path.segments())
}

fn get_segments<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = value;

    for segment in segments {
        current = match (current, segment) {
            (Value::Object(fields), Segment::Key(key)) => fields.get(key)?,
            (Value::Array(items), Segment::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Returns a mutable reference to the value at `path`.
pub fn get_mut<'a>(value: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    get_segments_mut(value, path.segments())
}

fn get_segments_mut<'a>(value: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut current = value;

    for segment in segments {
        current = match (current, segment) {
            (Value::Object(fields), Segment::Key(key)) => fields.get_mut(key)?,
            (Value::Array(items), Segment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Applies `change` to the position `path` addresses inside `root`.
///
/// Returns `true` if the tree was written. A path whose parent does not
/// resolve, an out-of-range final index, or a target of the wrong kind
/// leaves `root` unchanged and returns `false`.
///
/// A `Replace` whose final segment names a key missing from an existing
/// object inserts that key.
pub fn apply_change(root: &mut Value, path: &Path, change: Change) -> bool {
    let Some((parent_segments, last)) = path.split_last() else {
        return apply_to_slot(root, change);
    };

    let Some(parent) = get_segments_mut(root, parent_segments) else {
        trace!("dropping change: parent of '{}' does not resolve", path);
        return false;
    };

    match (parent, last) {
        (Value::Object(fields), Segment::Key(key)) => match fields.get_mut(key) {
            Some(slot) => apply_to_slot(slot, change),
            None => match change {
                Change::Replace(value) => {
                    fields.insert(key.clone(), value);
                    true
                }
                _ => {
                    trace!("dropping change: '{}' does not exist", path);
                    false
                }
            },
        },
        (Value::Array(items), Segment::Index(index)) => match items.get_mut(*index) {
            Some(slot) => apply_to_slot(slot, change),
            None => {
                trace!(
                    "dropping change: index {} out of bounds for array of {}",
                    index,
                    items.len()
                );
                false
            }
        },
        (parent, segment) => {
            trace!(
                "dropping change: segment '{}' does not apply to {}",
                segment,
                parent.kind()
            );
            false
        }
    }
}

fn apply_to_slot(slot: &mut Value, change: Change) -> bool {
    match change {
        Change::Replace(value) => {
            replace_or_merge(slot, value);
            true
        }
        Change::Append(value) => match slot {
            Value::Array(items) => {
                items.push(value);
                true
            }
            other => {
                trace!("dropping append: target is {}, not array", other.kind());
                false
            }
        },
        Change::SetKeyValue { key, value } => match slot {
            Value::Object(fields) => {
                fields.insert(key, value);
                true
            }
            other => {
                trace!("dropping key write: target is {}, not object", other.kind());
                false
            }
        },
    }
}

fn replace_or_merge(slot: &mut Value, incoming: Value) {
    match (slot, incoming) {
        (Value::Array(existing), Value::Array(incoming)) => existing.extend(incoming),
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                existing.insert(key, value);
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}

/// Returns a copy of `value` with `new_value` written at `path` (replace mode).
pub fn set(value: &Value, path: &Path, new_value: Value) -> Value {
    with_change(value, path, Change::Replace(new_value))
}

/// Returns a copy of `value` with `item` pushed onto the array at `path`.
pub fn append(value: &Value, path: &Path, item: Value) -> Value {
    with_change(value, path, Change::Append(item))
}

/// Returns a copy of `value` with `key` set inside the object at `path`.
pub fn set_key_value(value: &Value, path: &Path, key: impl Into<String>, item: Value) -> Value {
    with_change(
        value,
        path,
        Change::SetKeyValue {
            key: key.into(),
            value: item,
        },
    )
}

fn with_change(value: &Value, path: &Path, change: Change) -> Value {
    let mut root = value.clone();
    apply_change(&mut root, path, change);
    root
}
