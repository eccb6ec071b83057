//! Wrapper shapes a recovered JSON value may take.

use edugenie_error::{ParseError, ParseErrorKind, ParseResult};
use serde_json::Value;

/// The known ways a model presents an array of records.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// A plain JSON array.
    Bare(Vec<Value>),
    /// `{"type": "array", "items": [...]}`
    TaggedItems(Vec<Value>),
    /// `{"type": "array", "data": [...]}`
    TaggedData(Vec<Value>),
}

impl ResponseShape {
    /// Classifies a recovered value.
    ///
    /// ```
    /// use edugenie_models::repair::ResponseShape;
    /// use serde_json::json;
    ///
    /// let shape = ResponseShape::classify(json!({"type": "array", "data": [1]})).unwrap();
    /// assert_eq!(shape, ResponseShape::TaggedData(vec![json!(1)]));
    /// ```
    ///
    /// # Errors
    ///
    /// [`ParseErrorKind::UnexpectedResponseShape`] for anything else.
    pub fn classify(value: Value) -> ParseResult<Self> {
        match value {
            Value::Array(entries) => Ok(Self::Bare(entries)),
            Value::Object(mut map) if map.get("type").and_then(Value::as_str) == Some("array") => {
                match (map.remove("items"), map.remove("data")) {
                    (Some(Value::Array(items)), _) => Ok(Self::TaggedItems(items)),
                    (_, Some(Value::Array(data))) => Ok(Self::TaggedData(data)),
                    _ => Err(ParseError::new(ParseErrorKind::UnexpectedResponseShape(
                        "type \"array\" without items or data".to_string(),
                    ))),
                }
            }
            other => Err(ParseError::new(ParseErrorKind::UnexpectedResponseShape(
                format!("expected an array, found {}", kind_of(&other)),
            ))),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bare(_) => "bare",
            Self::TaggedItems(_) => "tagged-items",
            Self::TaggedData(_) => "tagged-data",
        }
    }

    /// The wrapped entries.
    pub fn into_entries(self) -> Vec<Value> {
        match self {
            Self::Bare(entries) | Self::TaggedItems(entries) | Self::TaggedData(entries) => entries,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn items_take_precedence_over_data() {
        let shape = ResponseShape::classify(json!({"type": "array", "items": [1], "data": [2]})).unwrap();
        assert_eq!(shape, ResponseShape::TaggedItems(vec![json!(1)]));
    }

    #[test]
    fn tagged_wrapper_without_entries_is_rejected() {
        let err = ResponseShape::classify(json!({"type": "array", "items": {"type": "object"}})).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedResponseShape(_)));
    }

    #[test]
    fn untagged_object_is_rejected() {
        let err = ResponseShape::classify(json!({"cards": []})).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedResponseShape("expected an array, found an object".to_string())
        );
    }
}
