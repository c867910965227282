// ── Key-value attribute form ──
//
// The host stores resource state as a flat JSON object. These helpers read
// that form with checked shapes (a wrong type is an `InvalidAttribute`
// error, never a panic) and normalize empty strings to "unset".

use serde_json::{Map, Value};

use crate::error::CoreError;

/// Host-visible resource state.
pub type AttributeMap = Map<String, Value>;

/// Conversion between a typed resource state and its key-value form.
pub trait Attributes: Sized {
    fn to_attributes(&self) -> AttributeMap;
    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError>;
}

// ── Readers ──────────────────────────────────────────────────────────

fn present<'a>(map: &'a AttributeMap, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn wrong_shape(key: &str, expected: &str, got: &Value) -> CoreError {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    };
    CoreError::invalid(key, format!("expected {expected}, found {kind}"))
}

/// Required-shape string; missing reads as `""`.
pub fn string(map: &AttributeMap, key: &str) -> Result<String, CoreError> {
    match present(map, key) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(wrong_shape(key, "a string", other)),
    }
}

/// Optional string; missing, null, and `""` all read as `None`.
pub fn opt_string(map: &AttributeMap, key: &str) -> Result<Option<String>, CoreError> {
    let s = string(map, key)?;
    Ok((!s.is_empty()).then_some(s))
}

/// Tri-state boolean.
///
/// Accepts `"true"`/`"false"` (surrounding quotes stripped) and JSON
/// booleans. Missing, null, and `""` read as `None`.
pub fn tri_bool(map: &AttributeMap, key: &str) -> Result<Option<bool>, CoreError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) => match s.replace('"', "").trim() {
            "" => Ok(None),
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(CoreError::invalid(
                key,
                format!("expected \"true\", \"false\" or empty, found {other:?}"),
            )),
        },
        Some(other) => Err(wrong_shape(key, "\"true\" or \"false\"", other)),
    }
}

/// Plain boolean with a default for missing values.
pub fn bool_or(map: &AttributeMap, key: &str, default: bool) -> Result<bool, CoreError> {
    Ok(tri_bool(map, key)?.unwrap_or(default))
}

/// Number, `0.0` when missing.
pub fn number(map: &AttributeMap, key: &str) -> Result<f64, CoreError> {
    match present(map, key) {
        None => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| CoreError::invalid(key, "number out of range")),
        Some(other) => Err(wrong_shape(key, "a number", other)),
    }
}

/// Optional 32-bit integer. Numeric strings are accepted; `""` is unset.
pub fn opt_i32(map: &AttributeMap, key: &str) -> Result<Option<i32>, CoreError> {
    let raw = match present(map, key) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(other) => return Err(wrong_shape(key, "an integer", other)),
    };
    raw.and_then(|n| i32::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| CoreError::invalid(key, "expected a 32-bit integer"))
}

/// List of strings; missing reads as empty.
pub fn string_list(map: &AttributeMap, key: &str) -> Result<Vec<String>, CoreError> {
    match present(map, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(wrong_shape(&format!("{key}[{i}]"), "a string", other)),
            })
            .collect(),
        Some(other) => Err(wrong_shape(key, "a list", other)),
    }
}

/// Nested object, if present.
pub fn object<'a>(map: &'a AttributeMap, key: &str) -> Result<Option<&'a AttributeMap>, CoreError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        // A one-element list is how block attributes are often materialized.
        Some(Value::Array(items)) if items.len() <= 1 => match items.first() {
            None => Ok(None),
            Some(Value::Object(inner)) => Ok(Some(inner)),
            Some(other) => Err(wrong_shape(key, "an object", other)),
        },
        Some(other) => Err(wrong_shape(key, "an object", other)),
    }
}

/// List of nested objects; missing reads as empty.
pub fn objects<'a>(map: &'a AttributeMap, key: &str) -> Result<Vec<&'a AttributeMap>, CoreError> {
    match present(map, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::Object(inner) => Ok(inner),
                other => Err(wrong_shape(&format!("{key}[{i}]"), "an object", other)),
            })
            .collect(),
        Some(other) => Err(wrong_shape(key, "a list", other)),
    }
}

/// Qualify a nested element's errors with its position, e.g. `team[1].role`.
pub fn within(prefix: &str, err: CoreError) -> CoreError {
    match err {
        CoreError::InvalidAttribute { field, reason } => CoreError::InvalidAttribute {
            field: format!("{prefix}.{field}"),
            reason,
        },
        other => other,
    }
}

// ── Writers ──────────────────────────────────────────────────────────

/// Insert an optional string, omitting the key when unset.
pub fn put_opt_string(map: &mut AttributeMap, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        map.insert(key.to_owned(), Value::from(v));
    }
}

/// Insert a tri-state boolean as `"true"`/`"false"`, omitting the key when unset.
pub fn put_tri_bool(map: &mut AttributeMap, key: &str, value: Option<bool>) {
    if let Some(b) = value {
        map.insert(key.to_owned(), Value::from(if b { "true" } else { "false" }));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn map(value: Value) -> AttributeMap {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_string_is_unset() {
        let m = map(json!({ "name": "", "icon": null }));
        assert_eq!(opt_string(&m, "name").unwrap(), None);
        assert_eq!(opt_string(&m, "icon").unwrap(), None);
        assert_eq!(opt_string(&m, "url").unwrap(), None);
    }

    #[test]
    fn tri_bool_reads_all_three_states() {
        let m = map(json!({
            "a": "true",
            "b": "\"false\"",
            "c": "",
            "d": true,
        }));
        assert_eq!(tri_bool(&m, "a").unwrap(), Some(true));
        assert_eq!(tri_bool(&m, "b").unwrap(), Some(false));
        assert_eq!(tri_bool(&m, "c").unwrap(), None);
        assert_eq!(tri_bool(&m, "d").unwrap(), Some(true));
        assert_eq!(tri_bool(&m, "missing").unwrap(), None);
    }

    #[test]
    fn tri_bool_rejects_garbage_without_panicking() {
        let m = map(json!({ "a": "yes", "b": 3 }));
        assert!(matches!(
            tri_bool(&m, "a"),
            Err(CoreError::InvalidAttribute { .. })
        ));
        assert!(matches!(
            tri_bool(&m, "b"),
            Err(CoreError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn put_tri_bool_omits_unset() {
        let mut m = AttributeMap::new();
        put_tri_bool(&mut m, "x", None);
        put_tri_bool(&mut m, "y", Some(false));
        assert!(!m.contains_key("x"));
        assert_eq!(m["y"], json!("false"));
    }

    #[test]
    fn wrong_shape_names_the_field() {
        let m = map(json!({ "team_ids": ["a", 7] }));
        let err = string_list(&m, "team_ids").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid attribute `team_ids[1]`: expected a string, found a number"
        );
    }

    #[test]
    fn opt_i32_accepts_numeric_strings() {
        let m = map(json!({ "a": "101", "b": 7, "c": "", "d": 5_000_000_000_i64 }));
        assert_eq!(opt_i32(&m, "a").unwrap(), Some(101));
        assert_eq!(opt_i32(&m, "b").unwrap(), Some(7));
        assert_eq!(opt_i32(&m, "c").unwrap(), None);
        assert!(opt_i32(&m, "d").is_err());
    }

    #[test]
    fn within_prefixes_nested_fields() {
        let err = within("team[0]", CoreError::invalid("role", "bad"));
        assert_eq!(err.to_string(), "Invalid attribute `team[0].role`: bad");
    }
}
