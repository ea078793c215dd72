//! Value reader: materializes the token at the scanner's position.

use indexmap::IndexMap;

use crate::scanner::{JsonEvent, JsonScanner, ScanToken};
use crate::{JsonValue, ScanError};

/// Materialize the value at the scanner's current position.
///
/// Objects keep tokenizer field order; a duplicate key replaces the earlier
/// value in place. Tokens that cannot begin a value materialize as `Null`.
pub fn read_value(scan: &mut JsonScanner) -> Result<JsonValue, ScanError> {
    match scan.next()? {
        JsonEvent::BeginObject => read_object_body(scan),
        JsonEvent::BeginArray => read_array_body(scan),
        JsonEvent::Null => Ok(JsonValue::Null),
        JsonEvent::Bool(b) => Ok(JsonValue::Bool(b)),
        JsonEvent::Integer(i) => Ok(JsonValue::Integer(i)),
        JsonEvent::Float(f) => Ok(JsonValue::Float(f)),
        JsonEvent::Str(s) => Ok(JsonValue::Str(s)),
        JsonEvent::Name(_) | JsonEvent::EndObject | JsonEvent::EndArray | JsonEvent::End => {
            Ok(JsonValue::Null)
        }
    }
}

fn read_object_body(scan: &mut JsonScanner) -> Result<JsonValue, ScanError> {
    let mut fields = IndexMap::new();
    loop {
        match scan.next()? {
            JsonEvent::Name(key) => {
                let value = read_value(scan)?;
                fields.insert(key, value);
            }
            JsonEvent::EndObject | JsonEvent::End => break,
            _ => return Err(ScanError::Invalid(scan.offset())),
        }
    }
    Ok(JsonValue::Object(fields))
}

fn read_array_body(scan: &mut JsonScanner) -> Result<JsonValue, ScanError> {
    let mut items = Vec::new();
    loop {
        match scan.peek()? {
            ScanToken::EndArray => {
                scan.next()?;
                break;
            }
            ScanToken::End => break,
            _ => items.push(read_value(scan)?),
        }
    }
    Ok(JsonValue::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(input: &str) -> JsonValue {
        read_value(&mut JsonScanner::new(input.as_bytes())).unwrap()
    }

    #[test]
    fn materializes_nested_structures() {
        let v = read(r#"{"a": [1, 2.5, {"b": null}], "c": true}"#);
        assert_eq!(v, JsonValue::from(json!({"a": [1, 2.5, {"b": null}], "c": true})));
    }

    #[test]
    fn object_field_order_is_tokenizer_order() {
        let v = read(r#"{"z": 1, "a": 2, "m": 3}"#);
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let v = read(r#"{"a": 1, "a": 2}"#);
        assert_eq!(v.get("a"), Some(&JsonValue::Integer(2)));
        assert_eq!(v.as_object().unwrap().len(), 1);
    }

    #[test]
    fn stray_close_token_materializes_as_null() {
        assert_eq!(read("]"), JsonValue::Null);
        assert_eq!(read(""), JsonValue::Null);
    }

    #[test]
    fn unterminated_array_keeps_collected_prefix() {
        assert_eq!(
            read("[1, 2"),
            JsonValue::Array(vec![JsonValue::Integer(1), JsonValue::Integer(2)])
        );
    }
}
