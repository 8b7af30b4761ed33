//! PathQuill - path and selector based access to JSON-like trees.
//!
//! The crate reads and writes positions in a [`Value`] tree in three ways:
//!
//! - by [`Path`], a concrete list of keys and indices;
//! - by selector, a `/`-separated string whose components may filter keys
//!   and elements with queries (`books[?(@.title=Red)]/title`);
//! - by query alone, choosing elements of a list (`?(@.age>12)`, `..-1`).
//!
//! Writes never happen in place through these free functions: each returns an
//! updated copy. [`ValueTree`] offers the same operations on an owned tree.
//!
//! # Example
//!
//! ```
//! use pathquill::{get_by_selector, set_by_selector, Value};
//!
//! let library: Value = vec![(
//!     "books",
//!     Value::from(vec![
//!         vec![("title", Value::from("Alice"))].into_iter().collect::<Value>(),
//!         vec![("title", Value::from("Red"))].into_iter().collect::<Value>(),
//!     ]),
//! )]
//! .into_iter()
//! .collect();
//!
//! let updated = set_by_selector(&library, "books[?(@.title=Red)]/title", Value::from("Bingo"));
//! assert_eq!(
//!     get_by_selector(&updated, "books[..]/title"),
//!     vec![&Value::from("Alice"), &Value::from("Bingo")]
//! );
//! ```

pub mod config;
pub mod document;
pub mod file;
pub mod query;
pub mod selector;

pub use document::navigator::Change;
pub use document::path::{Path, Segment};
pub use document::tree::ValueTree;
pub use document::value::{Map, Value};
pub use query::{QueryEngine, QueryMatch};
pub use selector::Resolver;

/// Value at `path`, or `None` if any segment does not resolve.
pub fn get<'a>(value: &'a Value, path: &Path) -> Option<&'a Value> {
    document::navigator::get(value, path)
}

/// Copy of `value` with `new_value` written at `path`.
///
/// Objects written onto objects are merged and arrays onto arrays are
/// concatenated. An unresolvable path returns an unchanged copy.
pub fn set(value: &Value, path: &Path, new_value: Value) -> Value {
    document::navigator::set(value, path, new_value)
}

/// Values at every position `selector` resolves to. Invalid selectors
/// select nothing.
pub fn get_by_selector<'a>(value: &'a Value, selector: &str) -> Vec<&'a Value> {
    Resolver::new().get_by_selector(value, selector)
}

/// Copy of `value` with `new_value` written at every position `selector`
/// resolves to.
pub fn set_by_selector(value: &Value, selector: &str, new_value: Value) -> Value {
    Resolver::new().set_by_selector(value, selector, new_value)
}

/// Elements of `candidates` chosen by `query`, or `None` if the query does
/// not parse.
///
/// ```
/// use pathquill::{query_indices, Value};
///
/// let items: Vec<Value> = (0..6i64).map(Value::from).collect();
/// assert_eq!(query_indices(&items, "..-1").unwrap().indices, vec![5]);
/// assert_eq!(query_indices(&items, "?(@>=4)").unwrap().indices, vec![4, 5]);
/// ```
pub fn query_indices<'a>(candidates: &'a [Value], query: &str) -> Option<QueryMatch<'a>> {
    QueryEngine::new().execute(candidates, query)
}
