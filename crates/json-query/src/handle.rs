//! [`JsonQuery`] — the per-document query handle.

use json_query_path::{Filter, FilterMatcher, PathParser};
use json_query_scan::JsonValue;
use log::warn;
use std::path::Path;

use crate::builder::QueryBuilder;
use crate::cache::{split_filtered_path, ArrayCache};
use crate::eval::PathEvaluator;
use crate::source::Source;
use crate::{Predicate, QueryError};

/// A query handle over one memory-mapped JSON document.
///
/// Queries are synchronous and CPU-bound. The handle itself carries no
/// interior synchronization; shared use goes through the registry's
/// `Arc<Mutex<_>>` wrapper (see [`crate::registry`]).
#[derive(Debug)]
pub struct JsonQuery {
    // `None` once released; queries then return empty lists
    source: Option<Source>,
    cache: ArrayCache,
}

impl JsonQuery {
    /// Open `path` and map it read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        Ok(Self {
            source: Some(Source::open(path)?),
            cache: ArrayCache::default(),
        })
    }

    /// The canonical path of the mapped document, if not yet released.
    pub fn path(&self) -> Option<&Path> {
        self.source.as_ref().map(Source::path)
    }

    /// Evaluate `path` with no limit and no predicate.
    pub fn query(&self, path: &str) -> Vec<JsonValue> {
        self.query_with(path, -1, None)
    }

    /// Evaluate `path` returning at most `limit` results (`limit <= 0` means
    /// unlimited).
    pub fn query_limit(&self, path: &str, limit: i64) -> Vec<JsonValue> {
        self.query_with(path, limit, None)
    }

    /// Primary entry point: evaluate `path`, bounded by `limit`, keeping only
    /// values the predicate accepts.
    ///
    /// Served from the array cache when the path's array part has been cached
    /// via [`cache_array`](Self::cache_array); streamed from the mapped file
    /// otherwise. Query-time faults are absorbed: the result is the full
    /// matching set or an empty list, never an error.
    pub fn query_with(
        &self,
        path: &str,
        limit: i64,
        predicate: Option<&Predicate>,
    ) -> Vec<JsonValue> {
        if let Some(results) = self.query_cached(path, limit, predicate) {
            return results;
        }
        let mut results = self.stream_query(path, limit, predicate);
        // align `$.some.array` with `$.some.array[*]`
        if results.len() == 1 && results[0].is_array() {
            if let Some(JsonValue::Array(items)) = results.pop() {
                results = items;
            }
        }
        if limit > 0 && results.len() as i64 > limit {
            results.truncate(limit as usize);
        }
        results
    }

    /// Serve from the cache, or report a miss with `None`.
    fn query_cached(
        &self,
        path: &str,
        limit: i64,
        predicate: Option<&Predicate>,
    ) -> Option<Vec<JsonValue>> {
        match split_filtered_path(path) {
            None => {
                let entry = self.cache.get(path)?;
                Some(collect_bounded(entry, limit, predicate, None))
            }
            Some((array_path, filter_expr)) => {
                let entry = self.cache.get(array_path)?;
                let filter = PathParser::compile_filter(filter_expr);
                Some(collect_bounded(entry, limit, predicate, Some(&filter)))
            }
        }
    }

    /// Stream the mapped file through the compiled path. Raw results: no
    /// single-array flattening here.
    fn stream_query(&self, path: &str, limit: i64, predicate: Option<&Predicate>) -> Vec<JsonValue> {
        let source = match &self.source {
            Some(source) => source,
            None => {
                warn!("query `{path}` on a released handle");
                return Vec::new();
            }
        };
        let segments = PathParser::compile(path);
        let mut scan = source.scanner();
        match PathEvaluator::new(&segments, limit, predicate).run(&mut scan) {
            Ok(results) => results,
            Err(err) => {
                warn!("query `{path}` failed: {err}");
                Vec::new()
            }
        }
    }

    /// Materialize the array at `path` into the cache under the same key.
    ///
    /// Returns the cached contents, or `None` when the evaluation produced
    /// nothing (in which case nothing is cached).
    pub fn cache_array(&mut self, path: &str) -> Option<Vec<JsonValue>> {
        self.cache_array_as(path, path)
    }

    /// Like [`cache_array`](Self::cache_array) with an explicit cache key,
    /// allowing queries to alias the array under another path.
    pub fn cache_array_as(&mut self, path: &str, cache_key: &str) -> Option<Vec<JsonValue>> {
        let mut results = self.stream_query(path, -1, None);
        if results.len() == 1 && results[0].is_array() {
            if let Some(JsonValue::Array(items)) = results.pop() {
                results = items;
            }
        }
        if results.is_empty() {
            return None;
        }
        self.cache.store(cache_key, results.clone());
        Some(results)
    }

    pub fn is_array_cached(&self, path: &str) -> bool {
        self.cache.contains(path)
    }

    pub fn invalidate_array_cache(&mut self, path: &str) {
        self.cache.invalidate(path);
    }

    pub fn clear_array_cache(&mut self) {
        self.cache.clear();
    }

    /// Release the mapped buffer and drop all cached arrays. Reopening is
    /// explicit: construct a new handle.
    pub fn release(&mut self) {
        self.source = None;
        self.cache.clear();
    }

    /// Start a fluent query over `path`.
    pub fn select(&self, path: impl Into<String>) -> QueryBuilder<'_> {
        QueryBuilder::new(self, path.into())
    }
}

/// Scan `items` in order, applying the optional filter and predicate, up to
/// `limit`. Non-object items never pass a filter and are skipped silently.
fn collect_bounded(
    items: &[JsonValue],
    limit: i64,
    predicate: Option<&Predicate>,
    filter: Option<&Filter>,
) -> Vec<JsonValue> {
    let mut out = Vec::new();
    for item in items {
        if limit > 0 && out.len() as i64 >= limit {
            break;
        }
        if let Some(filter) = filter {
            if !FilterMatcher::matches(item, filter) {
                continue;
            }
        }
        if let Some(predicate) = predicate {
            if !predicate(item) {
                continue;
            }
        }
        out.push(item.clone());
    }
    out
}
