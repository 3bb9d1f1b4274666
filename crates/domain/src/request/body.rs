//! Request body validation and formatting

use crate::error::{DomainError, DomainResult};

/// Returns true if `value` parses as JSON.
#[must_use]
pub fn is_valid_json(value: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(value).is_ok()
}

/// Pretty-prints a JSON body with two-space indentation.
///
/// Returns the input unchanged when it is not valid JSON.
#[must_use]
pub fn format_json(value: &str) -> String {
    serde_json::from_str::<serde_json::Value>(value)
        .ok()
        .and_then(|parsed| serde_json::to_string_pretty(&parsed).ok())
        .unwrap_or_else(|| value.to_string())
}

/// Checks a body before it is submitted.
///
/// An empty body always passes; anything else must be valid JSON.
///
/// # Errors
///
/// Returns `DomainError::InvalidBody` with the parser message otherwise.
pub fn validate_body(body: &str) -> DomainResult<()> {
    if body.is_empty() {
        return Ok(());
    }
    serde_json::from_str::<serde_json::Value>(body)
        .map(|_| ())
        .map_err(|e| DomainError::InvalidBody(format!("Invalid JSON in request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_json_pretty_prints() {
        assert_eq!(format_json(r#"{"a":[1,2]}"#), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_format_json_keeps_invalid_input() {
        assert_eq!(format_json("{not json"), "{not json");
    }

    #[test]
    fn test_validate_body() {
        assert!(validate_body("").is_ok());
        assert!(validate_body(r#"{"ok": true}"#).is_ok());
        assert!(matches!(
            validate_body("name=value"),
            Err(DomainError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_is_valid_json() {
        assert!(is_valid_json("[]"));
        assert!(is_valid_json("\"text\""));
        assert!(!is_valid_json(""));
    }
}
