//! Structured payload parsing
//!
//! Parses extracted response text as strict JSON and exposes typed field
//! access. No recovery heuristics: downstream chain steps require exact
//! field values, so parsing is strict pass/fail and failures carry the
//! offending text.

use serde_json::Value;

use promptchain_utils::error::ParseError;

/// A parsed structured payload from one backend response.
///
/// Thin wrapper around a JSON value with accessors that turn missing or
/// mistyped fields into typed `ParseError`s instead of panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    value: Value,
}

impl Payload {
    /// Parse extracted text as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidJson` (carrying a snippet of the text)
    /// when the text is not well-formed JSON.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ParseError::invalid_json(text, e.to_string()))?;
        Ok(Self { value })
    }

    /// Access a string field by name.
    ///
    /// # Errors
    ///
    /// `ParseError::MissingField` if absent, `ParseError::WrongType` if
    /// present but not a string.
    pub fn str_field(&self, field: &str) -> Result<&str, ParseError> {
        match self.value.get(field) {
            None => Err(ParseError::MissingField {
                field: field.to_string(),
            }),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ParseError::WrongType {
                field: field.to_string(),
                expected: "string".to_string(),
            }),
        }
    }

    /// Access a list-of-strings field by name.
    ///
    /// # Errors
    ///
    /// `ParseError::MissingField` if absent, `ParseError::WrongType` if the
    /// field is not an array of strings.
    pub fn str_list_field(&self, field: &str) -> Result<Vec<String>, ParseError> {
        let items = match self.value.get(field) {
            None => {
                return Err(ParseError::MissingField {
                    field: field.to_string(),
                });
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ParseError::WrongType {
                    field: field.to_string(),
                    expected: "array of strings".to_string(),
                });
            }
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(ParseError::WrongType {
                    field: field.to_string(),
                    expected: "array of strings".to_string(),
                }),
            })
            .collect()
    }

    /// Access a string field constrained to an enumerated label set.
    ///
    /// # Errors
    ///
    /// Field errors as in [`str_field`](Self::str_field), plus
    /// `ParseError::UnknownLabel` when the value is not in `allowed`.
    pub fn label_field(&self, field: &str, allowed: &[&str]) -> Result<String, ParseError> {
        let label = self.str_field(field)?;
        if allowed.contains(&label) {
            Ok(label.to_string())
        } else {
            Err(ParseError::UnknownLabel {
                label: label.to_string(),
                allowed: allowed.join(", "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::strip_fences;

    #[test]
    fn test_parse_object() {
        let payload = Payload::parse(r#"{"title": "Unusual LLMs", "topic": "llms"}"#).unwrap();
        assert_eq!(payload.str_field("title").unwrap(), "Unusual LLMs");
        assert_eq!(payload.str_field("topic").unwrap(), "llms");
    }

    #[test]
    fn test_parse_malformed_is_error_not_panic() {
        let err = Payload::parse("{not json").unwrap_err();
        match err {
            ParseError::InvalidJson { snippet, .. } => assert_eq!(snippet, "{not json"),
            other => panic!("expected InvalidJson, got {other:?}"),
        }

        assert!(Payload::parse("").is_err());
        assert!(Payload::parse("plain prose, no JSON here").is_err());
    }

    #[test]
    fn test_missing_field() {
        let payload = Payload::parse(r#"{"title": "x"}"#).unwrap();
        let err = payload.str_field("topic").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                field: "topic".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_type_field() {
        let payload = Payload::parse(r#"{"count": 3}"#).unwrap();
        let err = payload.str_field("count").unwrap_err();
        assert!(matches!(err, ParseError::WrongType { .. }));
    }

    #[test]
    fn test_str_list_field() {
        let payload = Payload::parse(r#"{"sections": ["intro", "body", "outro"]}"#).unwrap();
        assert_eq!(
            payload.str_list_field("sections").unwrap(),
            vec!["intro", "body", "outro"]
        );
    }

    #[test]
    fn test_str_list_field_rejects_mixed_types() {
        let payload = Payload::parse(r#"{"sections": ["intro", 2]}"#).unwrap();
        let err = payload.str_list_field("sections").unwrap_err();
        assert!(matches!(err, ParseError::WrongType { .. }));
    }

    #[test]
    fn test_label_field_allowed() {
        let payload = Payload::parse(r#"{"sentiment": "positive"}"#).unwrap();
        let label = payload
            .label_field("sentiment", &["positive", "negative"])
            .unwrap();
        assert_eq!(label, "positive");
    }

    #[test]
    fn test_label_field_unknown() {
        let payload = Payload::parse(r#"{"sentiment": "ambivalent"}"#).unwrap();
        let err = payload
            .label_field("sentiment", &["positive", "negative"])
            .unwrap_err();
        match err {
            ParseError::UnknownLabel { label, allowed } => {
                assert_eq!(label, "ambivalent");
                assert_eq!(allowed, "positive, negative");
            }
            other => panic!("expected UnknownLabel, got {other:?}"),
        }
    }

    // Round trip across extractor + parser: field values survive regardless
    // of fence wrapping.
    #[test]
    fn test_extract_then_parse_round_trip() {
        let inner = r#"{"title": "A Title", "sections": ["a", "b"]}"#;
        let wrapped = [
            inner.to_string(),
            format!("```json\n{inner}\n```"),
            format!("```\n{inner}\n```"),
            format!("\n\n```json\n{inner}\n```\n"),
        ];

        for raw in &wrapped {
            let payload = Payload::parse(&strip_fences(raw)).unwrap();
            assert_eq!(payload.str_field("title").unwrap(), "A Title");
            assert_eq!(payload.str_list_field("sections").unwrap(), vec!["a", "b"]);
        }
    }
}
