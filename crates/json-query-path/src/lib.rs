//! JSONPath compiler and filter evaluation for json-query.
//!
//! Accepts the subset of JSONPath the query engine serves: root `$`, dotted
//! and bracketed property names, integer indexes, the `[*]` wildcard and
//! `[?(expr)]` filters, where `expr` compares `@.prop` against literals and
//! combines comparisons with `&&`/`||` and grouping parentheses.
//!
//! # Example
//!
//! ```
//! use json_query_path::{PathParser, PathSegment};
//!
//! let segments = PathParser::compile("$.store.book[*]");
//! assert_eq!(
//!     segments,
//!     vec![
//!         PathSegment::Name("store".into()),
//!         PathSegment::Name("book".into()),
//!         PathSegment::Wildcard,
//!     ]
//! );
//! ```

mod types;
pub use types::{ComparisonOperator, Condition, Filter, LogicalOperator, PathSegment};

mod parser;
pub use parser::PathParser;

mod matcher;
pub use matcher::FilterMatcher;
