//! JSON utility functions

use serde_json::{Map, Value as JsonValue};

use super::string::{format_number, group_digits, group_digits_u64};

/// Render a JSON value as readable text.
///
/// - strings verbatim
/// - booleans as `Yes` / `No`
/// - numbers with digit grouping
/// - null as `-`
/// - arrays and objects as compact JSON
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "-".to_string(),
        JsonValue::Bool(true) => "Yes".to_string(),
        JsonValue::Bool(false) => "No".to_string(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                group_digits(i)
            } else if let Some(u) = n.as_u64() {
                group_digits_u64(u)
            } else if let Some(f) = n.as_f64() {
                format_number(f)
            } else {
                n.to_string()
            }
        }
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| "[unserializable]".to_string())
        }
    }
}

/// Read a metadata field as a non-empty string.
///
/// Numbers and booleans are accepted and stringified; producers are not
/// consistent about quoting.
pub fn get_string(map: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match map.get(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a metadata field as an integer (number or numeric string)
pub fn get_i64(map: &Map<String, JsonValue>, key: &str) -> Option<i64> {
    match map.get(key)? {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a metadata field as a float (number or numeric string)
pub fn get_f64(map: &Map<String, JsonValue>, key: &str) -> Option<f64> {
    let value = match map.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Read the first non-empty string among several candidate keys
pub fn get_first_string(map: &Map<String, JsonValue>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| get_string(map, k))
}
