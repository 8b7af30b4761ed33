//! Error types for query parsing and evaluation.

use thiserror::Error;

/// Errors that can occur while parsing or evaluating a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query or one of its groups contains nothing to evaluate.
    #[error("Empty query expression")]
    EmptyExpression,
    /// A `(` without its `)`, or a stray `)`.
    #[error("Unmatched parenthesis at position {position}")]
    UnmatchedParenthesis { position: usize },
    /// Text between structural characters is not `@[.prop] op value`.
    #[error("Invalid condition '{condition}': {message}")]
    InvalidCondition { condition: String, message: String },
    /// The right-hand side of `=~` is not a valid regular expression.
    #[error("Invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
    /// A range query that is not `n`, `a..b`, `..b` or `a..`.
    #[error("Invalid range '{range}'")]
    InvalidRange { range: String },
    /// Groups nested deeper than the parser allows.
    #[error("Query groups nested deeper than {limit}")]
    NestingTooDeep { limit: usize },
    /// A `?{...}` query was given but no native predicate is configured.
    #[error("No native predicate evaluator configured for '{predicate}'")]
    PredicateUnavailable { predicate: String },
    /// The native predicate evaluator rejected the predicate.
    #[error("Native predicate failed: {0}")]
    Predicate(#[from] super::predicate::PredicateError),
}
