use super::error::SelectorError;
use super::filter::{Filter, Selector};
use crate::document::navigator::{apply_change, Change};
use crate::document::path::{Path, Segment};
use crate::document::value::Value;
use crate::query::evaluator::resolve_range;
use crate::query::{NativePredicate, QueryEngine};
use log::debug;

/// A position reached while walking a selector, and the value found there.
///
/// `source` is `None` when the last literal key or index does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRecord<'a> {
    pub navigator: Path,
    pub source: Option<&'a Value>,
}

impl<'a> FilteredRecord<'a> {
    fn root(value: &'a Value) -> Self {
        FilteredRecord {
            navigator: Path::root(),
            source: Some(value),
        }
    }

    fn child(&self, segment: Segment, source: Option<&'a Value>) -> Self {
        FilteredRecord {
            navigator: self.navigator.child(segment),
            source,
        }
    }
}

/// Expands selectors into concrete paths.
#[derive(Default, Clone, Copy)]
pub struct Resolver<'p> {
    engine: QueryEngine<'p>,
}

impl<'p> Resolver<'p> {
    pub fn new() -> Self {
        Resolver {
            engine: QueryEngine::new(),
        }
    }

    /// Creates a resolver that evaluates `?{...}` selectors with `predicate`.
    pub fn with_predicate(predicate: &'p dyn NativePredicate) -> Self {
        Resolver {
            engine: QueryEngine::with_predicate(predicate),
        }
    }

    /// Parses `selector` and expands it against `root`.
    pub fn resolve<'a>(
        &self,
        root: &'a Value,
        selector: &str,
    ) -> Result<Vec<FilteredRecord<'a>>, SelectorError> {
        let parsed = Selector::parse(selector)?;
        self.resolve_parsed(root, &parsed)
    }

    /// Walks the filters in order, starting from the root.
    ///
    /// Each filter maps every record to zero or more child records, so
    /// selectors with several multi-match filters yield the cross product of
    /// their matches, earlier filters varying slowest.
    pub fn resolve_parsed<'a>(
        &self,
        root: &'a Value,
        selector: &Selector,
    ) -> Result<Vec<FilteredRecord<'a>>, SelectorError> {
        let mut records = vec![FilteredRecord::root(root)];

        for filter in selector.filters() {
            let mut next = Vec::new();
            for record in &records {
                self.expand(record, filter, &mut next)?;
            }
            records = next;
        }

        Ok(records)
    }

    fn expand<'a>(
        &self,
        record: &FilteredRecord<'a>,
        filter: &Filter,
        out: &mut Vec<FilteredRecord<'a>>,
    ) -> Result<(), SelectorError> {
        match (filter, record.source) {
            (Filter::Key(key), Some(Value::Object(fields))) => {
                out.push(record.child(Segment::Key(key.clone()), fields.get(key)));
            }
            (Filter::KeySelector(query), Some(Value::Object(fields))) => {
                let keys: Vec<Value> = fields.keys().map(|k| Value::String(k.clone())).collect();
                for i in self.engine.matching_indices(&keys, query)? {
                    if let Some((key, value)) = fields.get_index(i) {
                        out.push(record.child(Segment::Key(key.clone()), Some(value)));
                    }
                }
            }
            (Filter::Index(index), Some(Value::Array(items))) => {
                out.push(record.child(Segment::Index(*index), items.get(*index)));
            }
            (Filter::IndexSelector(query), Some(Value::Array(items))) => {
                for i in self.engine.matching_indices(items, query)? {
                    out.push(record.child(Segment::Index(i), items.get(i)));
                }
            }
            (Filter::IndexRange(range), Some(Value::Array(items))) => {
                for i in resolve_range(range, items.len()) {
                    out.push(record.child(Segment::Index(i), items.get(i)));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Values at every position `selector` resolves to. Positions that do
    /// not exist are skipped; an invalid selector yields no values.
    pub fn get_by_selector<'a>(&self, value: &'a Value, selector: &str) -> Vec<&'a Value> {
        match self.resolve(value, selector) {
            Ok(records) => records.into_iter().filter_map(|r| r.source).collect(),
            Err(e) => {
                debug!("selector '{}' matched nothing: {}", selector, e);
                Vec::new()
            }
        }
    }

    /// Applies `change` at every position `selector` resolves to, in
    /// resolution order. Returns how many positions were written.
    ///
    /// There is no rollback: positions that cannot take the change are
    /// skipped and earlier writes persist.
    pub fn apply_by_selector(&self, root: &mut Value, selector: &str, change: &Change) -> usize {
        let paths: Vec<Path> = match self.resolve(root, selector) {
            Ok(records) => records.into_iter().map(|r| r.navigator).collect(),
            Err(e) => {
                debug!("selector '{}' matched nothing: {}", selector, e);
                return 0;
            }
        };

        let mut written = 0;
        for path in &paths {
            if apply_change(root, path, change.clone()) {
                written += 1;
            }
        }
        written
    }

    /// Returns a copy of `value` with `new_value` written (replace mode) at
    /// every position `selector` resolves to.
    pub fn set_by_selector(&self, value: &Value, selector: &str, new_value: Value) -> Value {
        let mut root = value.clone();
        self.apply_by_selector(&mut root, selector, &Change::Replace(new_value));
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    fn object(fields: Vec<(&str, Value)>) -> Value {
        fields.into_iter().collect()
    }

    fn library() -> Value {
        object(vec![(
            "books",
            Value::from(vec![
                object(vec![("title", Value::from("Alice"))]),
                object(vec![("title", Value::from("Red"))]),
                object(vec![("title", Value::from("Dark"))]),
            ]),
        )])
    }

    #[test]
    fn test_resolve_literal_path() {
        let tree = library();
        let records = Resolver::new().resolve(&tree, "books[1]/title").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].navigator, path!["books", 1usize, "title"]);
        assert_eq!(records[0].source, Some(&Value::from("Red")));
    }

    #[test]
    fn test_resolve_missing_literal_key_keeps_record() {
        let tree = library();
        let records = Resolver::new().resolve(&tree, "books[0]/author").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, None);
    }

    #[test]
    fn test_resolve_drops_records_of_wrong_kind() {
        let tree = library();
        let records = Resolver::new().resolve(&tree, "books/title").unwrap();
        assert!(records.is_empty());
        let records = Resolver::new().resolve(&tree, "books[9]/title").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_resolve_empty_selector_is_root() {
        let tree = library();
        let records = Resolver::new().resolve(&tree, "").unwrap();
        assert_eq!(records, vec![FilteredRecord::root(&tree)]);
    }

    #[test]
    fn test_resolve_index_selector() {
        let tree = library();
        let records = Resolver::new()
            .resolve(&tree, "books[?(@.title!=Red)]")
            .unwrap();
        let paths: Vec<String> = records.iter().map(|r| r.navigator.to_string()).collect();
        assert_eq!(paths, vec!["books/0", "books/2"]);
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let tree = library();
        assert!(Resolver::new().resolve(&tree, "books[?(@.title)]").is_err());
        assert!(Resolver::new()
            .get_by_selector(&tree, "books[?(@.title)]")
            .is_empty());
    }

    #[test]
    fn test_apply_counts_written_positions() {
        let mut tree = library();
        let written = Resolver::new().apply_by_selector(
            &mut tree,
            "books[..2]",
            &Change::SetKeyValue {
                key: "read".to_string(),
                value: Value::Bool(true),
            },
        );
        assert_eq!(written, 2);
        assert_eq!(
            crate::document::navigator::get(&tree, &path!["books", 1usize, "read"]),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            crate::document::navigator::get(&tree, &path!["books", 2usize, "read"]),
            None
        );
    }
}
