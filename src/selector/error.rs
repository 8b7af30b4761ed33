//! Error types for selector parsing and resolution.

use crate::query::QueryError;
use thiserror::Error;

/// Errors that can occur while parsing or resolving a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A `/`-separated component fits neither the key nor the bracket form.
    #[error("Invalid selector component '{component}': {message}")]
    InvalidComponent { component: String, message: String },
    /// A query embedded in a component failed to parse.
    #[error("Invalid query in selector component '{component}': {source}")]
    Query {
        component: String,
        #[source]
        source: QueryError,
    },
    /// A query failed while being evaluated (native predicate failure).
    #[error("Query evaluation failed: {0}")]
    Evaluation(#[from] QueryError),
}
