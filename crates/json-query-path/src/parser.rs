//! Path and filter-expression compiler.

use json_query_scan::JsonValue;
use log::warn;

use crate::types::{ComparisonOperator, Condition, Filter, LogicalOperator, PathSegment};

// Two-character operators must come before their one-character prefixes,
// otherwise `a<=b` splits as `a` `<` `=b`.
const OPERATORS: [(&str, ComparisonOperator); 6] = [
    ("<=", ComparisonOperator::LessEqual),
    (">=", ComparisonOperator::GreaterEqual),
    ("==", ComparisonOperator::Equal),
    ("!=", ComparisonOperator::NotEqual),
    ("<", ComparisonOperator::Less),
    (">", ComparisonOperator::Greater),
];

/// Compiles textual paths into [`PathSegment`] lists and filter expressions
/// into [`Filter`] trees.
///
/// Compilation is infallible: malformed filter expressions compile to
/// [`Filter::never`] with a warning, so a bad query matches nothing instead
/// of failing the caller.
pub struct PathParser;

impl PathParser {
    /// Compile a textual JSONPath into navigation steps.
    pub fn compile(path: &str) -> Vec<PathSegment> {
        let path = path.trim();
        let path = path.strip_prefix('$').unwrap_or(path);

        let mut segments = Vec::new();
        let mut token = String::new();
        let mut in_bracket = false;
        let mut in_filter = false;

        for ch in path.chars() {
            match ch {
                '.' if !in_bracket => flush_name(&mut token, &mut segments),
                '[' if !in_bracket => {
                    flush_name(&mut token, &mut segments);
                    in_bracket = true;
                }
                ']' if in_bracket && !in_filter => {
                    in_bracket = false;
                    segments.push(bracket_segment(token.trim()));
                    token.clear();
                }
                '(' if in_bracket => {
                    in_filter = true;
                    token.push(ch);
                }
                ')' if in_bracket => {
                    in_filter = false;
                    token.push(ch);
                }
                _ => token.push(ch),
            }
        }
        flush_name(&mut token, &mut segments);
        segments
    }

    /// Compile the content of a `[?(...)]` segment into a filter tree.
    pub fn compile_filter(expr: &str) -> Filter {
        let expr = expr.trim();
        if !parens_balanced(expr) {
            warn!("unbalanced parentheses in filter expression `{expr}`");
            return Filter::never();
        }
        parse_filter(expr)
    }
}

fn flush_name(token: &mut String, segments: &mut Vec<PathSegment>) {
    if !token.is_empty() {
        segments.push(PathSegment::Name(std::mem::take(token)));
    }
}

fn bracket_segment(token: &str) -> PathSegment {
    if token == "*" {
        return PathSegment::Wildcard;
    }
    if let Ok(index) = token.parse::<usize>() {
        return PathSegment::Index(index);
    }
    if let Some(rest) = token.strip_prefix('?') {
        return PathSegment::Filter(PathParser::compile_filter(rest.trim()));
    }
    PathSegment::Name(strip_quotes(token).to_string())
}

/// Strip one layer of matching `'` or `"` quotes.
fn strip_quotes(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[bytes.len() - 1] == bytes[0]
    {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

fn parens_balanced(expr: &str) -> bool {
    let mut depth = 0i32;
    for ch in expr.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn parse_filter(expr: &str) -> Filter {
    let expr = strip_outer_parens(expr);
    if expr.is_empty() {
        return Filter::never();
    }
    // `||` binds looser than `&&`, so it splits first
    if let Some(parts) = split_top_level(expr, "||") {
        return Filter::Group {
            op: LogicalOperator::Or,
            children: parts.into_iter().map(parse_filter).collect(),
        };
    }
    if let Some(parts) = split_top_level(expr, "&&") {
        return Filter::Group {
            op: LogicalOperator::And,
            children: parts.into_iter().map(parse_filter).collect(),
        };
    }
    match parse_condition(expr) {
        Some(condition) => Filter::Leaf {
            op: LogicalOperator::And,
            conditions: vec![condition],
        },
        None => {
            warn!("unparsable filter condition `{expr}`");
            Filter::never()
        }
    }
}

/// Strip pairs of outermost parentheses while they span the whole expression.
fn strip_outer_parens(expr: &str) -> &str {
    let mut expr = expr.trim();
    loop {
        if !(expr.starts_with('(') && expr.ends_with(')')) {
            return expr;
        }
        let mut depth = 0i32;
        let mut spans = true;
        for (i, ch) in expr.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 && i != expr.len() - 1 {
                        spans = false;
                        break;
                    }
                }
                _ => {}
            }
        }
        if !spans {
            return expr;
        }
        expr = expr[1..expr.len() - 1].trim();
    }
}

/// Split `expr` on `op` occurrences at paren depth 0.
fn split_top_level<'e>(expr: &'e str, op: &str) -> Option<Vec<&'e str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut chars = expr.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && expr[i..].starts_with(op) => {
                parts.push(&expr[start..i]);
                start = i + op.len();
                // both operators are two ASCII characters
                chars.next();
            }
            _ => {}
        }
    }
    if parts.is_empty() {
        return None;
    }
    parts.push(&expr[start..]);
    Some(parts)
}

fn parse_condition(expr: &str) -> Option<Condition> {
    for (symbol, op) in OPERATORS {
        if let Some(at) = expr.find(symbol) {
            let lhs = expr[..at].trim();
            let rhs = expr[at + symbol.len()..].trim();
            let property = lhs.strip_prefix("@.").unwrap_or(lhs);
            if property.is_empty() || rhs.is_empty() {
                return None;
            }
            return Some(Condition {
                property: property.to_string(),
                op,
                value: coerce_literal(rhs),
            });
        }
    }
    None
}

fn coerce_literal(raw: &str) -> JsonValue {
    if let Ok(i) = raw.parse::<i64>() {
        return JsonValue::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return JsonValue::Float(f);
    }
    match raw {
        "true" => JsonValue::Bool(true),
        "false" => JsonValue::Bool(false),
        _ => JsonValue::Str(strip_quotes(raw).to_string()),
    }
}
