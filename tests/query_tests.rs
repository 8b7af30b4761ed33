//! Integration tests for query parsing and evaluation.

use pathquill::document::parser::parse_value;
use pathquill::query::{
    LogicalOperator, NativePredicate, Parser, PredicateError, Query, QueryEngine, QueryError,
    QueryNode,
};
use pathquill::{query_indices, Value};
use serde_json::json;

fn models() -> Vec<Value> {
    ["OpenAI", "Grok", "Claude", "Gemini", "Perplexity", "Copilot"]
        .into_iter()
        .map(Value::from)
        .collect()
}

fn people() -> Vec<Value> {
    match parse_value(&json!([
        {"name": "John", "age": 19, "mark": 2.4, "isStudent": true},
        {"name": "Tako", "age": 11, "mark": 5.0, "isStudent": false},
        {"name": "Mia", "age": 30, "mark": 6.1, "isStudent": false}
    ])) {
        Value::Array(items) => items,
        _ => unreachable!(),
    }
}

fn indices(candidates: &[Value], query: &str) -> Vec<usize> {
    query_indices(candidates, query)
        .map(|m| m.indices)
        .unwrap_or_default()
}

#[test]
fn test_whole_candidate_equality() {
    let models = models();
    let found = query_indices(&models[..3], "?(@=Grok)").unwrap();
    assert_eq!(found.indices, vec![1]);
    assert_eq!(found.values, vec![&Value::from("Grok")]);
}

#[test]
fn test_regex_matches_only_first_model() {
    assert_eq!(indices(&models(), "?(@=~OpenA.)"), vec![0]);
    assert_eq!(indices(&models(), "?(@=~^C)"), vec![2, 5]);
}

#[test]
fn test_boolean_property() {
    let people = people();
    let found = query_indices(&people, "?(@.isStudent=true)").unwrap();
    assert_eq!(found.indices, vec![0]);
    assert_eq!(
        found.values[0].get_key("name"),
        Some(&Value::from("John"))
    );
}

#[test]
fn test_and_group() {
    assert_eq!(indices(&people(), "?((@.age>12)&(@.mark<5.5))"), vec![0]);
}

#[test]
fn test_or_group() {
    assert_eq!(indices(&people(), "?((@.age<12)|(@.mark>6))"), vec![1, 2]);
}

#[test]
fn test_nested_groups() {
    assert_eq!(
        indices(
            &people(),
            "?(((@.age>12)&(@.mark<5.5))|((@.isStudent=false)&(@.age<12)))"
        ),
        vec![0, 1]
    );
}

#[test]
fn test_flat_group_takes_first_operator() {
    let query = Parser::parse("?(@.age>12&@.mark<5.5|@.name=Tako)").unwrap();
    match query {
        Query::Node(QueryNode::Group(children, operator)) => {
            assert_eq!(children.len(), 3);
            assert_eq!(operator, LogicalOperator::And);
        }
        other => panic!("expected group, got {:?}", other),
    }
    assert!(indices(&people(), "?(@.age>12&@.mark<5.5|@.name=Tako)").is_empty());
}

#[test]
fn test_missing_property_is_false() {
    assert!(indices(&people(), "?(@.height>1)").is_empty());
    assert_eq!(indices(&people(), "?(@.height!=1)"), Vec::<usize>::new());
}

#[test]
fn test_numbers_compare_across_int_and_float() {
    assert_eq!(indices(&people(), "?(@.mark=5)"), vec![1]);
    assert_eq!(indices(&people(), "?(@.age>=19)"), vec![0, 2]);
    assert_eq!(indices(&people(), "?(@.age<=11)"), vec![1]);
}

#[test]
fn test_string_comparisons() {
    assert_eq!(indices(&people(), "?(@.name!=John)"), vec![1, 2]);
    // Ordering operators never match strings.
    assert!(indices(&people(), "?(@.name>A)").is_empty());
}

#[test]
fn test_ranges() {
    let three: Vec<Value> = (0..3i64).map(Value::from).collect();
    let six: Vec<Value> = (0..6i64).map(Value::from).collect();

    assert_eq!(indices(&three, "..2"), vec![0, 1]);
    assert_eq!(indices(&six, "..-1"), vec![5]);
    assert_eq!(indices(&six, "..-2"), vec![4, 5]);
    assert_eq!(indices(&six, "1..3"), vec![1, 2, 3]);
    assert_eq!(indices(&six, "4.."), vec![4, 5]);
    assert_eq!(indices(&six, ".."), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(indices(&six, "2..100"), vec![2, 3, 4, 5]);
    assert_eq!(indices(&six, "2"), vec![2]);
    assert!(indices(&six, "9..").is_empty());
    assert!(indices(&[], "..").is_empty());
}

#[test]
fn test_parse_failures_yield_none() {
    let models = models();
    for query in [
        "",
        "?(@=Grok",
        "?(@.title Red)",
        "?(@=~[unclosed)",
        "?(@.age>)",
        "1..2..3",
        "-1",
        "x",
    ] {
        assert!(
            query_indices(&models, query).is_none(),
            "'{}' should not parse",
            query
        );
    }
}

#[test]
fn test_try_execute_reports_errors() {
    let engine = QueryEngine::new();
    assert!(matches!(
        engine.try_execute(&models(), "?(@=~[)"),
        Err(QueryError::InvalidRegex { .. })
    ));
    assert!(matches!(
        engine.try_execute(&models(), "?{len > 4}"),
        Err(QueryError::PredicateUnavailable { .. })
    ));
}

struct LongerThan;

impl NativePredicate for LongerThan {
    fn evaluate(&self, predicate: &str, candidate: &Value) -> Result<bool, PredicateError> {
        let limit: usize = predicate
            .parse()
            .map_err(|_| PredicateError::new(format!("not a length: {}", predicate)))?;
        Ok(candidate.as_str().map_or(false, |s| s.len() > limit))
    }
}

#[test]
fn test_native_predicate() {
    let predicate = LongerThan;
    let engine = QueryEngine::with_predicate(&predicate);

    let models = models();
    let found = engine.execute(&models, "?{6}").unwrap();
    assert_eq!(found.indices, vec![4, 5]);

    // A failing predicate aborts the whole query.
    assert!(matches!(
        engine.try_execute(&models, "?{six}"),
        Err(QueryError::Predicate(_))
    ));
    assert!(engine.execute(&models, "?{six}").is_none());
}
