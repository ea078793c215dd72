//! Compiled path and filter representations.

use json_query_scan::JsonValue;

/// One navigation step of a compiled path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Exact-key match in an object: `.name`, `['name']`
    Name(String),
    /// Element selection in an array: `[3]`
    Index(usize),
    /// Every element of an array or every value of an object: `[*]`
    Wildcard,
    /// Predicate over array elements: `[?(expr)]`
    Filter(Filter),
}

/// Comparison operators accepted inside filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Less,         // <
    LessEqual,    // <=
    Equal,        // ==
    NotEqual,     // !=
    GreaterEqual, // >=
    Greater,      // >
}

/// Logical combinators for conditions and sub-filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And, // &&
    Or,  // ||
}

/// A single comparison: `@.property <op> literal`.
///
/// `value` is restricted by construction to `Integer`, `Float`, `Bool` or
/// `Str`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub property: String,
    pub op: ComparisonOperator,
    pub value: JsonValue,
}

/// A compiled filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Comparisons combined by one logical operator.
    Leaf {
        op: LogicalOperator,
        conditions: Vec<Condition>,
    },
    /// Sub-filters combined by one logical operator.
    Group {
        op: LogicalOperator,
        children: Vec<Filter>,
    },
}

impl Filter {
    /// The filter that matches nothing; produced for unparsable expressions.
    pub fn never() -> Self {
        Filter::Leaf {
            op: LogicalOperator::And,
            conditions: Vec::new(),
        }
    }
}
