use super::ast::{
    ComparisonOperator, Expected, Literal, LogicalOperator, Query, QueryCondition, QueryNode,
    RangeSpec,
};
use super::error::QueryError;
use super::parser::Parser;
use super::predicate::NativePredicate;
use crate::document::value::Value;
use log::debug;

/// Candidates that satisfied a query, in candidate order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMatch<'a> {
    pub indices: Vec<usize>,
    pub values: Vec<&'a Value>,
}

impl<'a> QueryMatch<'a> {
    fn from_indices(candidates: &'a [Value], indices: Vec<usize>) -> Self {
        let values = indices.iter().map(|&i| &candidates[i]).collect();
        QueryMatch { indices, values }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Runs parsed or textual queries against candidate lists.
///
/// Without a native predicate, `?{...}` queries fail with
/// [`QueryError::PredicateUnavailable`].
#[derive(Default, Clone, Copy)]
pub struct QueryEngine<'p> {
    predicate: Option<&'p dyn NativePredicate>,
}

impl<'p> QueryEngine<'p> {
    pub fn new() -> Self {
        QueryEngine { predicate: None }
    }

    /// Creates an engine that forwards `?{...}` queries to `predicate`.
    pub fn with_predicate(predicate: &'p dyn NativePredicate) -> Self {
        QueryEngine {
            predicate: Some(predicate),
        }
    }

    /// Parses and runs `query`, degrading any failure to `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use pathquill::document::value::Value;
    /// use pathquill::query::QueryEngine;
    ///
    /// let names: Vec<Value> = ["OpenAI", "Grok", "Claude"].into_iter().map(Value::from).collect();
    /// let engine = QueryEngine::new();
    ///
    /// let found = engine.execute(&names, "?(@=Grok)").unwrap();
    /// assert_eq!(found.indices, vec![1]);
    ///
    /// // Parse failures yield no match rather than an error.
    /// assert!(engine.execute(&names, "?(@=Grok").is_none());
    /// ```
    pub fn execute<'a>(&self, candidates: &'a [Value], query: &str) -> Option<QueryMatch<'a>> {
        match self.try_execute(candidates, query) {
            Ok(found) => Some(found),
            Err(e) => {
                debug!("query '{}' produced no match: {}", query, e);
                None
            }
        }
    }

    /// Parses and runs `query`, reporting parse and predicate failures.
    pub fn try_execute<'a>(
        &self,
        candidates: &'a [Value],
        query: &str,
    ) -> Result<QueryMatch<'a>, QueryError> {
        let parsed = Parser::parse(query)?;
        let indices = self.matching_indices(candidates, &parsed)?;
        Ok(QueryMatch::from_indices(candidates, indices))
    }

    /// Returns the indices of `candidates` selected by an already parsed query.
    ///
    /// Ranges select positions directly and never go through boolean
    /// evaluation.
    pub fn matching_indices(
        &self,
        candidates: &[Value],
        query: &Query,
    ) -> Result<Vec<usize>, QueryError> {
        match query {
            Query::Node(QueryNode::Range(range)) => Ok(resolve_range(range, candidates.len())),
            Query::Node(node) => Ok(candidates
                .iter()
                .enumerate()
                .filter(|(_, candidate)| evaluate_node(node, candidate))
                .map(|(i, _)| i)
                .collect()),
            Query::Native(predicate) => {
                let evaluator =
                    self.predicate
                        .ok_or_else(|| QueryError::PredicateUnavailable {
                            predicate: predicate.clone(),
                        })?;
                let mut indices = Vec::new();
                for (i, candidate) in candidates.iter().enumerate() {
                    if evaluator.evaluate(predicate, candidate)? {
                        indices.push(i);
                    }
                }
                Ok(indices)
            }
        }
    }
}

/// Evaluates a filter node against one candidate.
///
/// Groups evaluate every child, then fold the results left to right with the
/// group's operator.
pub fn evaluate_node(node: &QueryNode, candidate: &Value) -> bool {
    match node {
        QueryNode::Condition(condition) => evaluate_condition(condition, candidate),
        QueryNode::Group(children, operator) => {
            let Some((first, rest)) = children.split_first() else {
                return false;
            };
            let mut result = evaluate_node(first, candidate);
            for child in rest {
                let current = evaluate_node(child, candidate);
                result = match operator {
                    LogicalOperator::And => result && current,
                    LogicalOperator::Or => result || current,
                };
            }
            result
        }
        QueryNode::Range(_) => false,
    }
}

fn evaluate_condition(condition: &QueryCondition, candidate: &Value) -> bool {
    let actual = match &condition.property {
        None => candidate,
        Some(property) => match candidate.get_key(property) {
            Some(value) => value,
            None => return false,
        },
    };
    compare(actual, condition.operator, &condition.expected)
}

fn compare(actual: &Value, operator: ComparisonOperator, expected: &Expected) -> bool {
    use ComparisonOperator::*;

    if operator == RegexMatch {
        return match (actual, &expected.pattern) {
            (Value::String(s), Some(pattern)) => pattern.is_match(s),
            _ => false,
        };
    }

    match (actual, &expected.literal) {
        (Value::Int(_) | Value::Float(_), Literal::Number(wanted)) => match actual.as_f64() {
            Some(number) => compare_numbers(number, *wanted, operator),
            None => false,
        },
        (Value::String(s), _) => match operator {
            Equal => *s == expected.raw,
            NotEqual => *s != expected.raw,
            _ => false,
        },
        (Value::Bool(b), Literal::Bool(wanted)) => match operator {
            Equal => b == wanted,
            NotEqual => b != wanted,
            _ => false,
        },
        _ => false,
    }
}

fn compare_numbers(actual: f64, wanted: f64, operator: ComparisonOperator) -> bool {
    match operator {
        ComparisonOperator::Equal => actual == wanted,
        ComparisonOperator::NotEqual => actual != wanted,
        ComparisonOperator::GreaterThan => actual > wanted,
        ComparisonOperator::GreaterThanOrEqual => actual >= wanted,
        ComparisonOperator::LessThan => actual < wanted,
        ComparisonOperator::LessThanOrEqual => actual <= wanted,
        ComparisonOperator::RegexMatch => false,
    }
}

/// Converts a range into positions of a sequence of `len` elements.
///
/// - `a..b`: `a` clamped to `[0, len]`, `b` clamped to `[0, len - 1]`, both
///   ends included
/// - `..b` with `b >= 0`: the first `b` positions
/// - `..b` with `b < 0`: the last `|b|` positions
/// - `a..`: from `a` to the end
/// - `..`: every position
pub fn resolve_range(range: &RangeSpec, len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let n = len as i64;

    let (start, end) = match (range.start, range.end) {
        (Some(start), Some(end)) => (start.clamp(0, n), end.clamp(0, n - 1)),
        (None, Some(end)) if end >= 0 => (0, end.min(n) - 1),
        (None, Some(end)) => ((n + end).max(0), n - 1),
        (Some(start), None) => (start.clamp(0, n), n - 1),
        (None, None) => (0, n - 1),
    };

    if start > end {
        return Vec::new();
    }
    (start..=end).map(|i| i as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::PredicateError;

    fn strings(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    fn person(name: &str, age: i64, mark: f64, is_student: bool) -> Value {
        vec![
            ("name", Value::from(name)),
            ("age", Value::Int(age)),
            ("mark", Value::Float(mark)),
            ("isStudent", Value::Bool(is_student)),
        ]
        .into_iter()
        .collect()
    }

    fn indices(candidates: &[Value], query: &str) -> Vec<usize> {
        QueryEngine::new()
            .execute(candidates, query)
            .map(|m| m.indices)
            .unwrap_or_default()
    }

    #[test]
    fn test_whole_string_equality() {
        let names = strings(&["OpenAI", "Grok", "Claude"]);
        assert_eq!(indices(&names, "?(@=Grok)"), vec![1]);
        assert_eq!(indices(&names, "?(@!=Grok)"), vec![0, 2]);
    }

    #[test]
    fn test_regex_is_unanchored() {
        let names = strings(&["OpenAI", "Grok", "Claude", "Gemini", "Perplexity", "Copilot"]);
        assert_eq!(indices(&names, "?(@=~OpenA.)"), vec![0]);
        assert_eq!(indices(&names, "?(@=~e)"), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_string_ordering_is_false() {
        let names = strings(&["a", "b"]);
        assert!(indices(&names, "?(@>a)").is_empty());
    }

    #[test]
    fn test_numeric_comparison_widens_ints() {
        let people = vec![person("John", 19, 2.4, true), person("Tako", 10, 9.3, false)];
        assert_eq!(indices(&people, "?(@.age>12)"), vec![0]);
        assert_eq!(indices(&people, "?(@.age=10)"), vec![1]);
        assert_eq!(indices(&people, "?(@.mark<=9.3)"), vec![0, 1]);
        assert_eq!(indices(&people, "?((@.age>12)&(@.mark<5.5))"), vec![0]);
    }

    #[test]
    fn test_bool_comparison() {
        let people = vec![person("John", 19, 2.4, true), person("Tako", 10, 9.3, false)];
        assert_eq!(indices(&people, "?(@.isStudent=true)"), vec![0]);
        assert_eq!(indices(&people, "?(@.isStudent!=true)"), vec![1]);
        assert!(indices(&people, "?(@.isStudent>false)").is_empty());
    }

    #[test]
    fn test_missing_property_is_false() {
        let people = vec![person("John", 19, 2.4, true)];
        assert!(indices(&people, "?(@.height>1)").is_empty());
        assert!(indices(&people, "?(@.height!=1)").is_empty());
    }

    #[test]
    fn test_kind_mismatch_is_false() {
        let people = vec![person("John", 19, 2.4, true)];
        assert!(indices(&people, "?(@.name>3)").is_empty());
        assert!(indices(&people, "?(@.age=nineteen)").is_empty());
        assert!(indices(&people, "?(@.age=~1)").is_empty());
    }

    #[test]
    fn test_string_compared_with_raw_text() {
        let keys = strings(&["1", "2.0", "true"]);
        assert_eq!(indices(&keys, "?(@=1)"), vec![0]);
        assert_eq!(indices(&keys, "?(@=2.0)"), vec![1]);
        assert_eq!(indices(&keys, "?(@=true)"), vec![2]);
    }

    #[test]
    fn test_group_or() {
        let people = vec![
            person("John", 19, 2.4, true),
            person("Tako", 10, 9.3, false),
            person("Mia", 15, 5.0, true),
        ];
        assert_eq!(indices(&people, "?((@.age<12)|(@.mark<3))"), vec![0, 1]);
    }

    #[test]
    fn test_mixed_group_applies_first_operator() {
        let people = vec![
            person("John", 19, 2.4, true),
            person("Tako", 10, 9.3, false),
        ];
        // Read as (age>12) | (name=Tako) | (mark>100), not with & binding tighter.
        assert_eq!(
            indices(&people, "?(@.age>12 | @.name=Tako & @.mark>100)"),
            vec![0, 1]
        );
    }

    #[test]
    fn test_range_resolution() {
        assert_eq!(resolve_range(&RangeSpec::new(None, Some(2)), 3), vec![0, 1]);
        assert_eq!(resolve_range(&RangeSpec::new(None, Some(-1)), 6), vec![5]);
        assert_eq!(resolve_range(&RangeSpec::new(None, Some(-10)), 3), vec![0, 1, 2]);
        assert_eq!(resolve_range(&RangeSpec::new(Some(1), Some(3)), 6), vec![1, 2, 3]);
        assert_eq!(resolve_range(&RangeSpec::new(Some(1), Some(30)), 3), vec![1, 2]);
        assert_eq!(resolve_range(&RangeSpec::new(Some(4), Some(2)), 6), Vec::<usize>::new());
        assert_eq!(resolve_range(&RangeSpec::new(Some(4), None), 6), vec![4, 5]);
        assert_eq!(resolve_range(&RangeSpec::new(None, None), 2), vec![0, 1]);
        assert_eq!(resolve_range(&RangeSpec::single(1), 3), vec![1]);
        assert_eq!(resolve_range(&RangeSpec::single(3), 3), Vec::<usize>::new());
        assert_eq!(resolve_range(&RangeSpec::new(None, Some(2)), 0), Vec::<usize>::new());
    }

    #[test]
    fn test_range_query_returns_values() {
        let names = strings(&["a", "b", "c"]);
        let found = QueryEngine::new().execute(&names, "..2").unwrap();
        assert_eq!(found.indices, vec![0, 1]);
        assert_eq!(found.values, vec![&names[0], &names[1]]);
    }

    #[test]
    fn test_parse_failure_is_none() {
        let names = strings(&["a"]);
        let engine = QueryEngine::new();
        assert!(engine.execute(&names, "?((@=a)").is_none());
        assert!(engine.execute(&names, "?(@=~(()").is_none());
        assert!(engine.execute(&names, "a..b").is_none());
    }

    #[test]
    fn test_native_predicate() {
        let names = strings(&["Grok", "Claude", "Gemini"]);
        let starts_with = |predicate: &str, candidate: &Value| -> Result<bool, PredicateError> {
            let prefix = predicate
                .strip_prefix("startsWith ")
                .ok_or_else(|| PredicateError::new("unsupported predicate"))?;
            Ok(candidate.as_str().is_some_and(|s| s.starts_with(prefix)))
        };
        let engine = QueryEngine::with_predicate(&starts_with);

        assert_eq!(
            engine.execute(&names, "?{startsWith G}").map(|m| m.indices),
            Some(vec![0, 2])
        );
        assert!(engine.execute(&names, "?{endsWith G}").is_none());
    }

    #[test]
    fn test_native_predicate_unavailable() {
        let names = strings(&["Grok"]);
        assert!(matches!(
            QueryEngine::new().try_execute(&names, "?{anything}"),
            Err(QueryError::PredicateUnavailable { .. })
        ));
    }
}
