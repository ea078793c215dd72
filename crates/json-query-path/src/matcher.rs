//! Filter evaluation against materialized objects.

use json_query_scan::JsonValue;

use crate::types::{ComparisonOperator, Condition, Filter, LogicalOperator};

/// Matches materialized values against compiled [`Filter`] trees.
pub struct FilterMatcher;

impl FilterMatcher {
    /// Whether `value` satisfies `filter`. Non-objects never match.
    pub fn matches(value: &JsonValue, filter: &Filter) -> bool {
        match value {
            JsonValue::Object(_) => Self::matches_filter(value, filter),
            _ => false,
        }
    }

    fn matches_filter(value: &JsonValue, filter: &Filter) -> bool {
        match filter {
            Filter::Leaf { op, conditions } => {
                if conditions.is_empty() {
                    return false;
                }
                Self::combine(*op, conditions.iter(), |c| Self::matches_condition(value, c))
            }
            Filter::Group { op, children } => {
                if children.is_empty() {
                    return false;
                }
                Self::combine(*op, children.iter(), |f| Self::matches_filter(value, f))
            }
        }
    }

    fn combine<T>(
        op: LogicalOperator,
        items: impl Iterator<Item = T>,
        mut pred: impl FnMut(T) -> bool,
    ) -> bool {
        match op {
            LogicalOperator::And => {
                for item in items {
                    if !pred(item) {
                        return false;
                    }
                }
                true
            }
            LogicalOperator::Or => {
                for item in items {
                    if pred(item) {
                        return true;
                    }
                }
                false
            }
        }
    }

    fn matches_condition(value: &JsonValue, condition: &Condition) -> bool {
        let actual = match value.get(&condition.property) {
            Some(actual) => actual,
            // a missing property fails every comparison, `!=` included
            None => return false,
        };
        match condition.op {
            ComparisonOperator::Equal => Self::values_equal(actual, &condition.value),
            ComparisonOperator::NotEqual => !Self::values_equal(actual, &condition.value),
            ComparisonOperator::Less
            | ComparisonOperator::LessEqual
            | ComparisonOperator::Greater
            | ComparisonOperator::GreaterEqual => {
                let (a, b) = match (actual.as_f64(), condition.value.as_f64()) {
                    (Some(a), Some(b)) => (a, b),
                    // ordering is defined for numeric pairs only
                    _ => return false,
                };
                match condition.op {
                    ComparisonOperator::Less => a < b,
                    ComparisonOperator::LessEqual => a <= b,
                    ComparisonOperator::Greater => a > b,
                    ComparisonOperator::GreaterEqual => a >= b,
                    _ => unreachable!(),
                }
            }
        }
    }

    /// Structural equality with integer-to-float promotion on numeric pairs.
    fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        }
    }
}
