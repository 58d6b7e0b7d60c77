//! Loose scalar coercions for schema-less query records

use serde_json::Value;

/// Parse a whole string as a finite number, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the longest numeric prefix of a string, so `"12.5ms"` reads as
/// `12.5`. Leading whitespace is skipped; a string with no leading digits
/// yields `None`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Value-column coercion: numbers as-is, strings by numeric prefix.
/// Booleans, nulls and nested values are not numbers.
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

/// A JSON number, or a string that is entirely a finite number.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(|v| v.is_finite()),
        Value::String(s) => parse_number(s).is_some(),
        _ => false,
    }
}

/// Whether a grouping value is usable as a series key: empty strings,
/// zero, `false` and `null` are not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a grouping value as a series name. Integral floats drop their
/// fractional part so `1.0` and `1` name the same series.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// JSON type name used in contract-violation messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number_strict() {
        assert_eq!(parse_number(" 42.5 "), Some(42.5));
        assert_eq!(parse_number("-1e3"), Some(-1000.0));
        assert_eq!(parse_number("12px"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("12.5ms"), Some(12.5));
        assert_eq!(parse_float_prefix("  -3"), Some(-3.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
    }

    #[test]
    fn test_parse_float_values() {
        assert_eq!(parse_float(&json!(3)), Some(3.0));
        assert_eq!(parse_float(&json!("4.25")), Some(4.25));
        assert_eq!(parse_float(&json!(true)), None);
        assert_eq!(parse_float(&json!(null)), None);
        assert_eq!(parse_float(&json!([1])), None);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric(&json!(0)));
        assert!(is_numeric(&json!("17")));
        assert!(!is_numeric(&json!("17 apples")));
        assert!(!is_numeric(&json!(null)));
        assert!(!is_numeric(&json!(false)));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!("eu-west")));
        assert!(is_truthy(&json!(2)));
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(null)));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(display_string(&json!("a")), "a");
        assert_eq!(display_string(&json!(7)), "7");
        assert_eq!(display_string(&json!(7.0)), "7");
        assert_eq!(display_string(&json!(7.5)), "7.5");
        assert_eq!(display_string(&json!(true)), "true");
    }
}
