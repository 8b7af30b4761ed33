//! Capability interface for the `?{...}` predicate dialect.
//!
//! The query engine does not interpret `?{...}` itself. It forwards the inner
//! text and each candidate to a [`NativePredicate`] supplied by the caller and
//! treats the returned verdict exactly like the verdict of a `?(...)` filter.
//!
//! Any closure of the right shape is a predicate:
//!
//! ```
//! use pathquill::document::value::Value;
//! use pathquill::query::predicate::{NativePredicate, PredicateError};
//!
//! let non_empty = |predicate: &str, candidate: &Value| -> Result<bool, PredicateError> {
//!     match predicate {
//!         "nonEmpty" => Ok(!candidate.as_str().unwrap_or_default().is_empty()),
//!         other => Err(PredicateError::new(format!("unknown predicate {}", other))),
//!     }
//! };
//! assert_eq!(non_empty.evaluate("nonEmpty", &Value::from("x")), Ok(true));
//! assert!(non_empty.evaluate("bogus", &Value::Null).is_err());
//! ```

use crate::document::value::Value;
use thiserror::Error;

/// Failure reported by a native predicate evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PredicateError {
    pub message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Evaluates a predicate in an externally defined grammar against one candidate.
pub trait NativePredicate {
    fn evaluate(&self, predicate: &str, candidate: &Value) -> Result<bool, PredicateError>;
}

impl<F> NativePredicate for F
where
    F: Fn(&str, &Value) -> Result<bool, PredicateError>,
{
    fn evaluate(&self, predicate: &str, candidate: &Value) -> Result<bool, PredicateError> {
        self(predicate, candidate)
    }
}
