//! Query string parser.
//!
//! Three dialects share one entry point, [`Parser::parse`]:
//!
//! - `?( ... )` boolean filters built from conditions, `&`, `|` and
//!   parenthesised groups,
//! - `?{ ... }` predicates passed through untouched to a native evaluator,
//! - anything else is a range: `n`, `a..b`, `..b`, `a..` or `..`.

use super::ast::{
    ComparisonOperator, Expected, Literal, LogicalOperator, Query, QueryCondition, QueryNode,
    RangeSpec,
};
use super::error::QueryError;
use regex::Regex;

/// Deepest group nesting accepted in a `?(...)` filter.
pub const MAX_GROUP_DEPTH: usize = 64;

/// Parser for query strings.
pub struct Parser;

impl Parser {
    /// Parses a query string in any of the supported dialects.
    pub fn parse(query: &str) -> Result<Query, QueryError> {
        let query = query.trim();

        if let Some(rest) = query.strip_prefix("?(") {
            let inner = rest
                .strip_suffix(')')
                .ok_or(QueryError::UnmatchedParenthesis { position: 1 })?;
            let chars: Vec<char> = inner.chars().collect();
            return Ok(Query::Node(parse_expression(&chars, 2, 0)?));
        }

        if let Some(rest) = query.strip_prefix("?{") {
            let inner = rest
                .strip_suffix('}')
                .ok_or_else(|| QueryError::InvalidCondition {
                    condition: query.to_string(),
                    message: "missing closing '}'".to_string(),
                })?
                .trim();
            if inner.is_empty() {
                return Err(QueryError::EmptyExpression);
            }
            return Ok(Query::Native(inner.to_string()));
        }

        Ok(Query::Node(QueryNode::Range(parse_range(query)?)))
    }
}

/// Parses the inside of a group.
///
/// `offset` is the position of `chars[0]` in the original query and is only
/// used for error reporting.
fn parse_expression(chars: &[char], offset: usize, depth: usize) -> Result<QueryNode, QueryError> {
    if depth > MAX_GROUP_DEPTH {
        return Err(QueryError::NestingTooDeep {
            limit: MAX_GROUP_DEPTH,
        });
    }

    let mut nodes = Vec::new();
    let mut operators = Vec::new();
    let mut current = String::new();

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '(' => {
                let close = find_closing(chars, i).ok_or(QueryError::UnmatchedParenthesis {
                    position: offset + i,
                })?;
                nodes.push(parse_expression(
                    &chars[i + 1..close],
                    offset + i + 1,
                    depth + 1,
                )?);
                i = close;
            }
            ')' => {
                return Err(QueryError::UnmatchedParenthesis {
                    position: offset + i,
                })
            }
            ch @ ('&' | '|') => {
                flush_condition(&mut current, &mut nodes)?;
                operators.push(if ch == '&' {
                    LogicalOperator::And
                } else {
                    LogicalOperator::Or
                });
            }
            ch => current.push(ch),
        }
        i += 1;
    }
    flush_condition(&mut current, &mut nodes)?;

    // A group that mixes `&` and `|` is combined with the first operator seen.
    match nodes.len() {
        0 => Err(QueryError::EmptyExpression),
        1 => Ok(nodes.remove(0)),
        _ => Ok(QueryNode::Group(
            nodes,
            operators.first().copied().unwrap_or(LogicalOperator::And),
        )),
    }
}

/// Returns the index of the `)` matching the `(` at `open`.
fn find_closing(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &ch) in chars.iter().enumerate().skip(open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn flush_condition(current: &mut String, nodes: &mut Vec<QueryNode>) -> Result<(), QueryError> {
    if !current.trim().is_empty() {
        nodes.push(QueryNode::Condition(parse_condition(current)?));
    }
    current.clear();
    Ok(())
}

/// Parses `@[.property] op value`.
pub fn parse_condition(text: &str) -> Result<QueryCondition, QueryError> {
    ConditionLexer::new(text.trim()).parse()
}

struct ConditionLexer {
    source: String,
    chars: Vec<char>,
    position: usize,
}

impl ConditionLexer {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            chars: source.chars().collect(),
            position: 0,
        }
    }

    fn parse(mut self) -> Result<QueryCondition, QueryError> {
        if self.next() != Some('@') {
            return Err(self.error("expected '@'"));
        }

        let property = if self.peek() == Some('.') {
            self.next();
            Some(self.parse_identifier()?)
        } else {
            None
        };

        self.skip_whitespace();
        let operator = self.parse_operator()?;
        self.skip_whitespace();

        let raw: String = self.chars[self.position..].iter().collect();
        let raw = raw.trim().to_string();
        if raw.is_empty() {
            return Err(self.error("missing value"));
        }

        let pattern = if operator == ComparisonOperator::RegexMatch {
            Some(Regex::new(&raw).map_err(|e| QueryError::InvalidRegex {
                pattern: raw.clone(),
                message: e.to_string(),
            })?)
        } else {
            None
        };

        Ok(QueryCondition {
            property,
            operator,
            expected: Expected {
                literal: coerce_literal(&raw),
                raw,
                pattern,
            },
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.position += 1;
        }
    }

    fn parse_identifier(&mut self) -> Result<String, QueryError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(self.error("expected property name after '@.'"))
        } else {
            Ok(name)
        }
    }

    /// Longest match first, so `>=` is never read as `>` followed by `=`.
    fn parse_operator(&mut self) -> Result<ComparisonOperator, QueryError> {
        let two = match (self.peek(), self.peek_at(1)) {
            (Some('!'), Some('=')) => Some(ComparisonOperator::NotEqual),
            (Some('>'), Some('=')) => Some(ComparisonOperator::GreaterThanOrEqual),
            (Some('<'), Some('=')) => Some(ComparisonOperator::LessThanOrEqual),
            (Some('='), Some('~')) => Some(ComparisonOperator::RegexMatch),
            _ => None,
        };
        if let Some(op) = two {
            self.position += 2;
            return Ok(op);
        }

        let one = match self.peek() {
            Some('=') => ComparisonOperator::Equal,
            Some('>') => ComparisonOperator::GreaterThan,
            Some('<') => ComparisonOperator::LessThan,
            _ => return Err(self.error("expected comparison operator")),
        };
        self.position += 1;
        Ok(one)
    }

    fn error(&self, message: &str) -> QueryError {
        QueryError::InvalidCondition {
            condition: self.source.clone(),
            message: message.to_string(),
        }
    }
}

/// Float first, then case-insensitive `true`/`false`, then text.
fn coerce_literal(raw: &str) -> Literal {
    if let Ok(number) = raw.parse::<f64>() {
        Literal::Number(number)
    } else if raw.eq_ignore_ascii_case("true") {
        Literal::Bool(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Literal::Bool(false)
    } else {
        Literal::Text(raw.to_string())
    }
}

/// Parses `n`, `a..b`, `..b`, `a..` or `..`.
pub fn parse_range(text: &str) -> Result<RangeSpec, QueryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QueryError::EmptyExpression);
    }

    let invalid = || QueryError::InvalidRange {
        range: text.to_string(),
    };

    if !text.contains("..") {
        let index = text.parse::<i64>().map_err(|_| invalid())?;
        if index < 0 {
            return Err(invalid());
        }
        return Ok(RangeSpec::single(index));
    }

    let tokens: Vec<&str> = text.split("..").map(str::trim).collect();
    if tokens.len() != 2 {
        return Err(invalid());
    }

    let bound = |token: &str| -> Result<Option<i64>, QueryError> {
        if token.is_empty() {
            Ok(None)
        } else {
            token.parse::<i64>().map(Some).map_err(|_| invalid())
        }
    };

    Ok(RangeSpec::new(bound(tokens[0])?, bound(tokens[1])?))
}
