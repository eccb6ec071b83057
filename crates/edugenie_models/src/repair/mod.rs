//! Recovery of typed study records from model output.
//!
//! Models asked for a JSON array often surround it with prose, wrap it in a
//! described-schema envelope, or emit a few malformed items. Parsing runs in
//! stages:
//!
//! 1. parse the whole text as JSON, else the span from the first `[` to the
//!    last `]`
//! 2. classify the value as a [`ResponseShape`] and take its entries
//! 3. drop schema fragments, unwrap `data` sub-objects and drop entries that
//!    carry none of the record's required fields
//! 4. coerce fields to strings and mint an id per record
//!
//! An empty result is always an error.
//!
//! # Examples
//!
//! ```
//! use edugenie_models::repair::parse_flashcards;
//!
//! let cards = parse_flashcards(r#"Sure! [{"front": "ATP", "back": "Energy"}] Enjoy."#).unwrap();
//! assert_eq!(cards.len(), 1);
//! assert_eq!(cards[0].front(), "ATP");
//! ```

mod fields;
mod records;
mod shape;

pub use records::{parse_flashcards, parse_quiz, reconcile_answer};
pub use shape::ResponseShape;

use edugenie_error::{ParseError, ParseErrorKind, ParseResult};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Recovers a JSON value from text that should contain an array.
///
/// # Errors
///
/// [`ParseErrorKind::UnparsableResponse`] when neither the whole text nor
/// its outermost bracketed span is valid JSON.
pub fn extract_json(raw: &str) -> ParseResult<Value> {
    if let Ok(value) = serde_json::from_str(raw.trim()) {
        return Ok(value);
    }

    let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) else {
        warn!(excerpt = %excerpt(raw), "No JSON array found in response");
        return Err(ParseError::new(ParseErrorKind::UnparsableResponse(
            "no array found".to_string(),
        )));
    };
    if end < start {
        warn!(excerpt = %excerpt(raw), "No JSON array found in response");
        return Err(ParseError::new(ParseErrorKind::UnparsableResponse(
            "no array found".to_string(),
        )));
    }

    debug!(start, end, "Parsing bracketed span");
    serde_json::from_str(&raw[start..=end]).map_err(|e| {
        warn!(error = %e, excerpt = %excerpt(raw), "Bracketed span is not valid JSON");
        ParseError::new(ParseErrorKind::UnparsableResponse(e.to_string()))
    })
}

/// Extracts the record objects carried by raw model output.
///
/// Entries are kept when they are objects, are not schema fragments (no
/// `properties` key) and carry at least one of `required`. An entry missing
/// every required field is unwrapped one level when it has a `data` object.
///
/// # Errors
///
/// Any [`extract_json`] or [`ResponseShape::classify`] error.
pub fn extract_entries(raw: &str, required: &[&str]) -> ParseResult<Vec<Map<String, Value>>> {
    let shape = ResponseShape::classify(extract_json(raw)?)?;
    debug!(shape = shape.name(), "Classified response");

    let entries = shape
        .into_entries()
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let Value::Object(mut map) = entry else {
                debug!(index, "Skipping non-object entry");
                return None;
            };
            if map.contains_key("properties") {
                debug!(index, "Skipping schema fragment");
                return None;
            }
            if !has_any(&map, required) {
                if let Some(Value::Object(inner)) = map.remove("data") {
                    map = inner;
                }
            }
            if !has_any(&map, required) {
                debug!(index, "Skipping entry without required fields");
                return None;
            }
            Some(map)
        })
        .collect();

    Ok(entries)
}

fn has_any(map: &Map<String, Value>, required: &[&str]) -> bool {
    required.iter().any(|key| map.contains_key(*key))
}

fn excerpt(raw: &str) -> String {
    edugenie_error::truncate_excerpt(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_text_parses_directly() {
        assert_eq!(extract_json(" [1, 2] ").unwrap(), serde_json::json!([1, 2]));
    }

    #[test]
    fn reversed_brackets_are_unparsable() {
        let err = extract_json("] nothing [").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnparsableResponse(_)));
    }

    #[test]
    fn data_wrapped_entries_are_unwrapped() {
        let raw = r#"[{"type": "object", "data": {"front": "a", "back": "b"}}]"#;
        let entries = extract_entries(raw, &["front", "back"]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["front"], "a");
    }

    #[test]
    fn schema_fragments_and_scalars_are_dropped() {
        let raw = r#"[{"type": "object", "properties": {"front": {"type": "string"}}}, 3, {"front": "x"}]"#;
        let entries = extract_entries(raw, &["front", "back"]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["front"], "x");
    }
}
