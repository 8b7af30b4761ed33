//! Selector string parser.
//!
//! A selector is a `/`-separated list of components. Each component is an
//! optional key part followed by an optional bracket part:
//!
//! - `name` - literal key
//! - `?(...)` or `?{...}` - keys chosen by a query over the object's keys
//! - `[3]` - literal index
//! - `[1..3]`, `[..2]`, `[..-1]` - index range
//! - `[?(...)]` or `[?{...}]` - elements chosen by a query
//!
//! `books[?(@.title=Red)]/title` therefore yields three filters: the key
//! `books`, an index selector and the key `title`.

use super::error::SelectorError;
use crate::query::parser::{parse_range, Parser};
use crate::query::{Query, RangeSpec};

/// One step of a parsed selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Key(String),
    KeySelector(Query),
    Index(usize),
    IndexSelector(Query),
    IndexRange(RangeSpec),
}

/// A parsed selector: the filters of all components, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    filters: Vec<Filter>,
}

impl Selector {
    /// Parses a selector string. Empty components (`a//b`, a leading or
    /// trailing `/`) are skipped.
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let mut filters = Vec::new();
        for component in selector.split('/').filter(|c| !c.is_empty()) {
            filters.extend(parse_component(component)?);
        }
        Ok(Selector { filters })
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }
}

/// Parses one component into its key filter and/or bracket filter.
pub fn parse_component(component: &str) -> Result<Vec<Filter>, SelectorError> {
    let mut filters = Vec::with_capacity(2);

    let (key_part, bracket_part) = split_component(component)?;

    if !key_part.is_empty() {
        if is_query(key_part) {
            filters.push(Filter::KeySelector(parse_query(component, key_part)?));
        } else {
            filters.push(Filter::Key(key_part.to_string()));
        }
    }

    if let Some(inner) = bracket_part {
        filters.push(parse_bracket(component, inner)?);
    }

    Ok(filters)
}

/// Splits a component into the key part and the text between `[` and `]`.
fn split_component(component: &str) -> Result<(&str, Option<&str>), SelectorError> {
    let key_end = if is_query(component) {
        let (open, close) = if component.starts_with("?(") {
            ('(', ')')
        } else {
            ('{', '}')
        };
        matching_close(component, 1, open, close)
            .map(|i| i + 1)
            .ok_or_else(|| invalid(component, "unterminated key selector"))?
    } else {
        component.find('[').unwrap_or(component.len())
    };

    let (key_part, rest) = component.split_at(key_end);
    if !is_query(key_part) && key_part.contains(']') {
        return Err(invalid(component, "unexpected bracket in key"));
    }

    if rest.is_empty() {
        return Ok((key_part, None));
    }

    let inner = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(|| invalid(component, "expected '[...]' after key"))?;
    Ok((key_part, Some(inner)))
}

fn parse_bracket(component: &str, inner: &str) -> Result<Filter, SelectorError> {
    let inner = inner.trim();

    if is_query(inner) {
        return Ok(Filter::IndexSelector(parse_query(component, inner)?));
    }

    if inner.contains("..") {
        return parse_range(inner)
            .map(Filter::IndexRange)
            .map_err(|source| SelectorError::Query {
                component: component.to_string(),
                source,
            });
    }

    if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
        return inner
            .parse::<usize>()
            .map(Filter::Index)
            .map_err(|_| invalid(component, "index out of range"));
    }

    Err(invalid(component, "expected index, range or query in brackets"))
}

fn parse_query(component: &str, text: &str) -> Result<Query, SelectorError> {
    Parser::parse(text).map_err(|source| SelectorError::Query {
        component: component.to_string(),
        source,
    })
}

fn is_query(text: &str) -> bool {
    text.starts_with("?(") || text.starts_with("?{")
}

/// Byte index of the bracket closing the one at `open_at`.
fn matching_close(text: &str, open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices().skip_while(|(i, _)| *i < open_at) {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn invalid(component: &str, message: &str) -> SelectorError {
    SelectorError::InvalidComponent {
        component: component.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryNode;

    #[test]
    fn test_parse_literal_key() {
        assert_eq!(
            parse_component("books").unwrap(),
            vec![Filter::Key("books".to_string())]
        );
    }

    #[test]
    fn test_parse_key_with_index() {
        assert_eq!(
            parse_component("books[2]").unwrap(),
            vec![Filter::Key("books".to_string()), Filter::Index(2)]
        );
    }

    #[test]
    fn test_parse_bare_index() {
        assert_eq!(parse_component("[0]").unwrap(), vec![Filter::Index(0)]);
    }

    #[test]
    fn test_parse_key_with_index_selector() {
        let filters = parse_component("books[?(@.title=Red)]").unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], Filter::Key("books".to_string()));
        assert!(matches!(
            filters[1],
            Filter::IndexSelector(Query::Node(QueryNode::Condition(_)))
        ));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            parse_component("items[..-1]").unwrap(),
            vec![
                Filter::Key("items".to_string()),
                Filter::IndexRange(RangeSpec::new(None, Some(-1)))
            ]
        );
        assert_eq!(
            parse_component("[1..3]").unwrap(),
            vec![Filter::IndexRange(RangeSpec::new(Some(1), Some(3)))]
        );
    }

    #[test]
    fn test_parse_key_selector_followed_by_index() {
        let filters = parse_component("?(@=~^stu)[0]").unwrap();
        assert_eq!(filters.len(), 2);
        assert!(matches!(filters[0], Filter::KeySelector(_)));
        assert_eq!(filters[1], Filter::Index(0));
    }

    #[test]
    fn test_parse_key_selector_with_nested_groups() {
        let filters = parse_component("?((@=a)|(@=b))").unwrap();
        assert_eq!(filters.len(), 1);
        assert!(matches!(
            filters[0],
            Filter::KeySelector(Query::Node(QueryNode::Group(_, _)))
        ));
    }

    #[test]
    fn test_parse_native_selectors() {
        let filters = parse_component("people[?{age > 3}]").unwrap();
        assert_eq!(filters[1], Filter::IndexSelector(Query::Native("age > 3".to_string())));
        let filters = parse_component("?{startsWith a}").unwrap();
        assert_eq!(filters[0], Filter::KeySelector(Query::Native("startsWith a".to_string())));
    }

    #[test]
    fn test_parse_selector_skips_empty_components() {
        let selector = Selector::parse("/books//[0]/title/").unwrap();
        assert_eq!(
            selector.filters(),
            &[
                Filter::Key("books".to_string()),
                Filter::Index(0),
                Filter::Key("title".to_string())
            ]
        );
        assert!(Selector::parse("").unwrap().filters().is_empty());
    }

    #[test]
    fn test_invalid_components() {
        for component in ["books[", "books[x]", "books]", "a[0]b", "[]", "?(@=a"] {
            assert!(
                matches!(
                    parse_component(component),
                    Err(SelectorError::InvalidComponent { .. })
                ),
                "{} should be rejected",
                component
            );
        }
    }

    #[test]
    fn test_invalid_query_in_component() {
        assert!(matches!(
            parse_component("books[?(@.title Red)]"),
            Err(SelectorError::Query { .. })
        ));
        assert!(matches!(
            parse_component("books[a..b]"),
            Err(SelectorError::Query { .. })
        ));
    }
}
