//! Helpers for reasoning about loosely-typed field values.

use serde_json::Value;

/// Truthiness as the UI layer evaluates it: `null`, `false`, `0`, `NaN` and
/// the empty string are falsy, everything else (including empty arrays and
/// objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number
            .as_f64()
            .is_none_or(|float| float != 0.0 && !float.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `true` for values the formatter treats as "not set".
pub fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Render a value the way string interpolation does: strings are used as-is,
/// everything else is JSON-encoded.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Truthy value rendered as text, `None` otherwise.
pub fn truthy_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(display_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_follows_ui_semantics() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn only_null_and_empty_string_are_unset() {
        assert!(is_unset(&json!(null)));
        assert!(is_unset(&json!("")));
        assert!(!is_unset(&json!(false)));
        assert!(!is_unset(&json!(0)));
        assert!(!is_unset(&json!([])));
    }

    #[test]
    fn display_does_not_quote_strings() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(truthy_text(Some(&json!(""))), None);
        assert_eq!(truthy_text(Some(&json!(7))), Some("7".to_owned()));
    }
}
