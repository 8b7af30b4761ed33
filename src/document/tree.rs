//! Owned document with path and selector access.
//!
//! `ValueTree` wraps a root [`Value`] and, optionally, the native predicate
//! used for `?{...}` queries. Reads borrow from the tree; writes modify it in
//! place.
//!
//! # Example
//!
//! ```
//! use pathquill::document::tree::ValueTree;
//! use pathquill::document::value::Value;
//! use pathquill::path;
//!
//! let mut tree = ValueTree::new(
//!     vec![("name", Value::from("Alice")), ("age", Value::from(30))]
//!         .into_iter()
//!         .collect(),
//! );
//!
//! assert_eq!(tree.get(&path!["name"]), Some(&Value::from("Alice")));
//!
//! tree.set(&path!["age"], Value::from(31));
//! assert_eq!(tree.get_str("$age"), vec![&Value::from(31)]);
//! ```

use super::navigator::{self, apply_change, Change};
use super::path::Path;
use super::value::Value;
use crate::query::NativePredicate;
use crate::selector::{FilteredRecord, Resolver, SelectorError};
use std::fmt;

/// Prefix that marks a string accessor as a selector rather than a key.
pub const SELECTOR_PREFIX: char = '$';

/// A document tree.
#[derive(Default)]
pub struct ValueTree {
    root: Value,
    predicate: Option<Box<dyn NativePredicate>>,
}

impl ValueTree {
    /// Creates a tree without a native predicate. `?{...}` queries fail on
    /// it and select nothing.
    pub fn new(root: Value) -> Self {
        Self {
            root,
            predicate: None,
        }
    }

    /// Creates a tree whose `?{...}` queries are handed to `predicate`.
    pub fn with_predicate(root: Value, predicate: impl NativePredicate + 'static) -> Self {
        Self {
            root,
            predicate: Some(Box::new(predicate)),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    /// Value at `path`, or `None` if the path does not resolve.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        navigator::get(&self.root, path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Value> {
        navigator::get_mut(&mut self.root, path)
    }

    /// Writes `value` at `path` (replace mode). Returns `false` when the path
    /// does not resolve.
    pub fn set(&mut self, path: &Path, value: Value) -> bool {
        apply_change(&mut self.root, path, Change::Replace(value))
    }

    /// Pushes `item` onto the array at `path`.
    pub fn append(&mut self, path: &Path, item: Value) -> bool {
        apply_change(&mut self.root, path, Change::Append(item))
    }

    /// Inserts or overwrites `key` in the object at `path`.
    pub fn set_key_value(&mut self, path: &Path, key: impl Into<String>, value: Value) -> bool {
        apply_change(
            &mut self.root,
            path,
            Change::SetKeyValue {
                key: key.into(),
                value,
            },
        )
    }

    /// Resolves `selector`, exposing parse and predicate errors.
    pub fn select(&self, selector: &str) -> Result<Vec<FilteredRecord<'_>>, SelectorError> {
        resolver(&self.predicate).resolve(&self.root, selector)
    }

    pub fn get_by_selector(&self, selector: &str) -> Vec<&Value> {
        resolver(&self.predicate).get_by_selector(&self.root, selector)
    }

    /// Writes `value` at every position `selector` resolves to. Returns how
    /// many positions were written.
    pub fn set_by_selector(&mut self, selector: &str, value: Value) -> usize {
        self.apply_by_selector(selector, &Change::Replace(value))
    }

    pub fn apply_by_selector(&mut self, selector: &str, change: &Change) -> usize {
        resolver(&self.predicate).apply_by_selector(&mut self.root, selector, change)
    }

    /// String accessor: `$books[0]/title` is a selector, `books` a single key
    /// of the root object.
    pub fn get_str(&self, accessor: &str) -> Vec<&Value> {
        match accessor.strip_prefix(SELECTOR_PREFIX) {
            Some(selector) => self.get_by_selector(selector),
            None => self.root.get_key(accessor).into_iter().collect(),
        }
    }

    /// String accessor counterpart of [`ValueTree::get_str`]. Returns how many
    /// positions were written.
    pub fn set_str(&mut self, accessor: &str, value: Value) -> usize {
        match accessor.strip_prefix(SELECTOR_PREFIX) {
            Some(selector) => self.set_by_selector(selector, value),
            None => usize::from(self.set(&Path::root().key(accessor), value)),
        }
    }
}

fn resolver(predicate: &Option<Box<dyn NativePredicate>>) -> Resolver<'_> {
    match predicate {
        Some(p) => Resolver::with_predicate(p.as_ref()),
        None => Resolver::new(),
    }
}

impl fmt::Debug for ValueTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTree")
            .field("root", &self.root)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl From<Value> for ValueTree {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}
