//! Fluent query builder layered over [`JsonQuery::query_with`].

use json_query_scan::JsonValue;

use crate::JsonQuery;

/// A chainable query. Obtained from [`JsonQuery::select`]; each call returns
/// an independent builder.
///
/// Predicates added with [`filter`](Self::filter) compose by logical AND and
/// run after streaming completes; they are not pushed into the evaluator.
pub struct QueryBuilder<'a> {
    handle: &'a JsonQuery,
    path: String,
    limit: i64,
    predicates: Vec<Box<dyn Fn(&JsonValue) -> bool>>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(handle: &'a JsonQuery, path: String) -> Self {
        Self {
            handle,
            path,
            limit: -1,
            predicates: Vec::new(),
        }
    }

    /// Replace the query path.
    pub fn from(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Bound the number of streamed results; non-positive means unlimited.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Keep only values the predicate accepts. Chained predicates must all
    /// accept.
    pub fn filter(mut self, predicate: impl Fn(&JsonValue) -> bool + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Run the query and collect the matches.
    pub fn execute(self) -> Vec<JsonValue> {
        let mut results = self.handle.query_with(&self.path, self.limit, None);
        if !self.predicates.is_empty() {
            results.retain(|value| self.predicates.iter().all(|p| p(value)));
        }
        results
    }

    /// Run the query and map each match.
    pub fn map<T>(self, f: impl FnMut(JsonValue) -> T) -> Vec<T> {
        self.execute().into_iter().map(f).collect()
    }

    /// The first match in document order, or `None`.
    pub fn first(mut self) -> Option<JsonValue> {
        // without post-filters one result is all the stream has to produce
        if self.predicates.is_empty() && self.limit <= 0 {
            self.limit = 1;
        }
        self.execute().into_iter().next()
    }

    /// The number of matches.
    pub fn count(self) -> usize {
        self.execute().len()
    }
}
