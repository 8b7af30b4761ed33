//! Query expressions for choosing keys and elements.
//!
//! A query string is matched against a list of candidates (array elements, or
//! the keys of an object) and selects some of them by position.
//!
//! # Supported Syntax
//!
//! - `?(@=Grok)` - whole candidate equals `Grok`
//! - `?(@.age>12)` - field `age` greater than 12 (`=`, `!=`, `>`, `>=`, `<`, `<=`)
//! - `?(@.name=~^Op)` - field `name` matches a regular expression
//! - `?((@.age>12)&(@.mark<5.5))` - groups joined with `&` or `|`
//! - `?{...}` - predicate handed to a caller-supplied evaluator
//! - `2`, `1..3`, `..2`, `..-1`, `3..` - positions by range
//!
//! Values are read as numbers when they parse as one, then as `true`/`false`,
//! and otherwise as text.
//!
//! # Examples
//!
//! ```
//! // ?(@.isStudent=true)        - students
//! // ?((@.age>12)|(@.age<5))    - older than 12 or younger than 5
//! // ..-1                       - last element
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod predicate;

pub use ast::{ComparisonOperator, LogicalOperator, Query, QueryCondition, QueryNode, RangeSpec};
pub use error::QueryError;
pub use evaluator::{QueryEngine, QueryMatch};
pub use parser::Parser;
pub use predicate::{NativePredicate, PredicateError};
