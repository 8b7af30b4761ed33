//! Syntax tree types for query expressions.

use regex::Regex;
use std::fmt;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `=~`
    RegexMatch,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::RegexMatch => "=~",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean operator joining the children of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `&`
    And,
    /// `|`
    Or,
}

/// The right-hand side of a condition after literal coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// The expected value of a condition.
///
/// The raw text is kept alongside the coerced literal so that string
/// candidates are compared against what the user wrote (`?(@=1)` matches the
/// key `"1"`). For `=~` the text is compiled once at parse time.
#[derive(Debug, Clone)]
pub struct Expected {
    pub literal: Literal,
    pub raw: String,
    pub pattern: Option<Regex>,
}

impl PartialEq for Expected {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
            && self.raw == other.raw
            && self.pattern.as_ref().map(Regex::as_str) == other.pattern.as_ref().map(Regex::as_str)
    }
}

/// A single comparison, `@[.property] op value`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    /// `None` compares the whole candidate
    pub property: Option<String>,
    pub operator: ComparisonOperator,
    pub expected: Expected,
}

/// Inclusive/open slice bounds of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl RangeSpec {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    /// A range selecting exactly one position.
    pub fn single(index: i64) -> Self {
        Self {
            start: Some(index),
            end: Some(index),
        }
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Condition(QueryCondition),
    /// Children combined with a single operator, left to right
    Group(Vec<QueryNode>, LogicalOperator),
    Range(RangeSpec),
}

/// A parsed query string in one of its dialects.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `?(...)` boolean filter or a `a..b` range
    Node(QueryNode),
    /// `?{...}` predicate text, handed to a native predicate evaluator
    Native(String),
}
