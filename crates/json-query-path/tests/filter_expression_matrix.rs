use json_query_path::{FilterMatcher, PathParser, PathSegment};
use json_query_scan::JsonValue;
use serde_json::json;

fn book(category: &str, price: f64) -> JsonValue {
    JsonValue::from(json!({"category": category, "price": price}))
}

fn matches(value: &JsonValue, expr: &str) -> bool {
    FilterMatcher::matches(value, &PathParser::compile_filter(expr))
}

#[test]
fn precedence_matrix() {
    let fiction_cheap = book("fiction", 5.0);
    let fiction_dear = book("fiction", 20.0);
    let reference_cheap = book("reference", 5.0);

    // || binds looser than &&: a && b || c  ==  (a && b) || c
    let expr = "@.category=='fiction'&&@.price<10||@.category=='reference'";
    assert!(matches(&fiction_cheap, expr));
    assert!(!matches(&fiction_dear, expr));
    assert!(matches(&reference_cheap, expr));

    // parens override: a && (b || c)
    let grouped = "@.category=='fiction'&&(@.price<10||@.price>15)";
    assert!(matches(&fiction_cheap, grouped));
    assert!(matches(&fiction_dear, grouped));
    assert!(!matches(&reference_cheap, grouped));
}

#[test]
fn nested_group_matrix() {
    let expr = "((@.category==\"数学\"&&@.price>50)||(@.category==\"历史\"&&@.price<10))";
    assert!(matches(&book("数学", 53.99), expr));
    assert!(!matches(&book("数学", 33.99), expr));
    assert!(matches(&book("历史", 5.59), expr));
    assert!(!matches(&book("历史", 23.59), expr));
    assert!(!matches(&book("fiction", 5.0), expr));
}

#[test]
fn malformed_expression_matrix() {
    let v = book("fiction", 5.0);
    // each of these must compile to a filter that matches nothing
    for expr in [
        "",
        "(",
        ")",
        "(@.category=='fiction'",
        "@.category=='fiction')",
        "@.category",
        "==5",
        "@.price==",
    ] {
        assert!(!matches(&v, expr), "`{expr}` should match nothing");
    }
    // imbalance anywhere poisons the whole expression
    assert!(!matches(&v, "@.category=='fiction'&&("));
}

#[test]
fn quoted_and_bareword_literal_matrix() {
    let v = book("fiction", 5.0);
    assert!(matches(&v, "@.category=='fiction'"));
    assert!(matches(&v, "@.category==\"fiction\""));
    assert!(matches(&v, "@.category==fiction"));
    assert!(!matches(&v, "@.category=='Fiction'"));
}

#[test]
fn whole_path_with_filter_compiles_once_and_repeatably() {
    let path = "$.store.book[?((@.a==1)||(@.b<2.5))]";
    let first = PathParser::compile(path);
    let second = PathParser::compile(path);
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert!(matches!(first[2], PathSegment::Filter(_)));
}
