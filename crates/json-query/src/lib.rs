//! Read-only JSONPath query engine over memory-mapped JSON documents.
//!
//! Tuned for repeated filtered lookups on large, mostly-array-shaped
//! configuration files, where the typical query extracts a few records from a
//! large array by predicate over object fields. Documents are mapped
//! read-only and walked in a single streaming pass; named arrays can be
//! cached once so later `[?(...)]` queries bypass the file entirely.
//!
//! # Example
//!
//! ```
//! use json_query::JsonQuery;
//!
//! let path = std::env::temp_dir().join("json-query-doc-example.json");
//! std::fs::write(
//!     &path,
//!     r#"{"book": [{"title": "a", "price": 8}, {"title": "b", "price": 14}]}"#,
//! )
//! .unwrap();
//!
//! let handle = JsonQuery::open(&path).unwrap();
//! let dear = handle.query("$.book[?(@.price>10)]");
//! assert_eq!(dear.len(), 1);
//! assert_eq!(dear[0].get("title").and_then(|t| t.as_str()), Some("b"));
//! ```
//!
//! # Failure model
//!
//! Opening a document can fail ([`QueryError`]); running a query cannot. Any
//! fault during streaming is logged and absorbed into an empty result list,
//! and the handle stays usable — the next query re-creates a tokenizer over
//! the mapped buffer. Malformed filter expressions compile to filters that
//! match nothing.
//!
//! # Concurrency
//!
//! A handle is not safe for concurrent queries on its own; the registry
//! ([`registry::get_or_create`]) hands out `Arc<Mutex<JsonQuery>>` so callers
//! serialize per document. The registry itself is a process-wide map behind a
//! single mutex.

mod error;
pub use error::QueryError;

mod source;
pub use source::Source;

mod eval;

mod cache;

mod handle;
pub use handle::JsonQuery;

mod builder;
pub use builder::QueryBuilder;

pub mod registry;
pub use registry::SharedHandle;

pub use json_query_path::{
    ComparisonOperator, Condition, Filter, FilterMatcher, LogicalOperator, PathParser, PathSegment,
};
pub use json_query_scan::{JsonValue, ScanError};

/// Caller predicate applied to leaf materializations, after any path-level
/// filters.
pub type Predicate = dyn Fn(&JsonValue) -> bool;
