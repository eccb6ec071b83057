//! Field coercion for loosely typed entries.

use serde_json::{Map, Value};

/// Reads `key` as a string. Missing and null become empty; other scalars
/// use their JSON text.
pub fn text(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).map(coerce).unwrap_or_default()
}

/// Reads the first present key of `keys` as a string.
pub fn text_any(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| map.get(*key))
        .map(coerce)
        .unwrap_or_default()
}

/// Reads `key` as a list of strings; anything but an array yields an empty list.
pub fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().map(coerce).collect(),
        _ => Vec::new(),
    }
}

fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn scalars_coerce_to_text() {
        let m = map(json!({"a": 42, "b": null, "c": true, "d": "x"}));
        assert_eq!(text(&m, "a"), "42");
        assert_eq!(text(&m, "b"), "");
        assert_eq!(text(&m, "c"), "true");
        assert_eq!(text(&m, "d"), "x");
        assert_eq!(text(&m, "missing"), "");
    }

    #[test]
    fn lists_coerce_items() {
        let m = map(json!({"options": [1, "two", null], "bad": "A, B"}));
        assert_eq!(string_list(&m, "options"), vec!["1", "two", ""]);
        assert!(string_list(&m, "bad").is_empty());
    }

    #[test]
    fn first_present_alias_wins() {
        let m = map(json!({"correct_answer": "B"}));
        assert_eq!(text_any(&m, &["correctAnswer", "correct_answer"]), "B");
    }
}
