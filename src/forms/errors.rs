use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key used for messages that belong to the form as a whole.
pub const FORM_FIELD: &str = "form";

/// Inline validation messages keyed by form field.
///
/// Only the first message per field is kept, which is what an inline error
/// slot under an input can show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    fields: BTreeMap<String, String>,
}

impl FormErrors {
    /// Record a message for `field` unless it already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Add `message` when `condition` fails.
    pub fn check(&mut self, condition: bool, field: &str, message: &str) {
        if !condition {
            self.add(field, message);
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set of errors, keeping existing messages on conflict.
    pub fn merge(&mut self, other: FormErrors) {
        for (field, message) in other.fields {
            self.fields.entry(field).or_insert(message);
        }
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Parse a backend 400 body.
    ///
    /// Accepts `{"field": ["msg", ...]}`, `{"field": "msg"}`,
    /// `{"detail": "msg"}` and `{"non_field_errors": [...]}`. Anything
    /// unparseable becomes a single form-level message.
    #[must_use]
    pub fn from_response_body(body: &str) -> Self {
        let mut errors = FormErrors::default();
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    let field = match key.as_str() {
                        "detail" | "non_field_errors" => FORM_FIELD,
                        other => other,
                    };
                    if let Some(message) = first_message(&value) {
                        errors.add(field, message);
                    }
                }
            }
            Ok(Value::Array(items)) => {
                if let Some(message) = items.iter().find_map(first_message) {
                    errors.add(FORM_FIELD, message);
                }
            }
            _ => {}
        }
        if errors.is_empty() {
            let trimmed = body.trim();
            let message = if trimmed.is_empty() || trimmed.starts_with('{') {
                "The request was rejected"
            } else {
                trimmed
            };
            errors.add(FORM_FIELD, message);
        }
        errors
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        Value::Object(map) => map.values().find_map(first_message),
        _ => None,
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FormErrors::default();
        errors.add("title", "Title is required");
        errors.add("title", "Title is too long");
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.len(), 1);
    }

    #[rstest]
    #[case(r#"{"title": ["This field may not be blank."]}"#, "title", "This field may not be blank.")]
    #[case(r#"{"detail": "Trip is full"}"#, FORM_FIELD, "Trip is full")]
    #[case(r#"{"non_field_errors": ["Duplicate offer"]}"#, FORM_FIELD, "Duplicate offer")]
    #[case(r#"{"budget": {"max": ["Too high"]}}"#, "budget", "Too high")]
    #[case("Bad Request", FORM_FIELD, "Bad Request")]
    #[case("", FORM_FIELD, "The request was rejected")]
    fn test_parse_backend_body(#[case] body: &str, #[case] field: &str, #[case] message: &str) {
        let errors = FormErrors::from_response_body(body);
        assert_eq!(errors.get(field), Some(message));
    }

    #[test]
    fn test_merge_keeps_client_message() {
        let mut client = FormErrors::default();
        client.add("title", "Title is required");
        let mut server = FormErrors::default();
        server.add("title", "blank");
        server.add("destination", "unknown place");
        client.merge(server);
        assert_eq!(client.get("title"), Some("Title is required"));
        assert_eq!(client.get("destination"), Some("unknown place"));
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = FormErrors::default();
        errors.add("b", "second");
        errors.add("a", "first");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }
}
