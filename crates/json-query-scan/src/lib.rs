//! Pull tokenizer and runtime value representation for json-query.
//!
//! This crate provides the pieces of the query engine that touch raw JSON
//! bytes: [`JsonValue`], the materialized runtime value; [`JsonScanner`], a
//! single-pass pull tokenizer over a byte slice; and [`read_value`], which
//! materializes the value at the scanner's current position.
//!
//! # Example
//!
//! ```
//! use json_query_scan::{read_value, JsonScanner, JsonValue};
//!
//! let mut scan = JsonScanner::new(br#"{"a": 1, "b": [true, "x"]}"#);
//! let value = read_value(&mut scan).unwrap();
//! assert_eq!(value.get("a"), Some(&JsonValue::Integer(1)));
//! ```

mod error;
pub use error::ScanError;

mod value;
pub use value::JsonValue;

mod scanner;
pub use scanner::{JsonEvent, JsonScanner, ScanToken};

mod reader;
pub use reader::read_value;

mod util;
