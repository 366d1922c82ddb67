//! Flat JSON records and tolerant field access.
//!
//! Resources are top-level arrays of flat objects. Exporters are not always
//! consistent about types (`"12.5"` vs `12.5`), so numeric reads accept both
//! and treat anything else as absence.

use serde_json::{Map, Value};

use crate::error::LoadError;

/// One flat record as delivered by the resource.
pub type Record = Map<String, Value>;

/// Parse a resource body into records.
///
/// Fails on invalid JSON or when the payload is not an array of objects.
pub fn parse_records(body: &[u8]) -> Result<Vec<Record>, LoadError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| LoadError::Parse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(LoadError::Shape(json_kind(&value).to_string()));
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) => out.push(map),
            other => {
                return Err(LoadError::Shape(format!(
                    "an array containing {}",
                    json_kind(&other)
                )));
            }
        }
    }
    Ok(out)
}

/// Read a numeric field; `None` when missing, null, unparsable or non-finite.
pub fn field_f64(record: &Record, name: &str) -> Option<f64> {
    let v = match record.get(name)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_number(s)?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

/// First finite numeric value among several candidate field names.
pub fn first_f64(record: &Record, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|name| field_f64(record, name))
}

/// Read an integral field (`2024`, `"2024"`, `2024.0`).
pub fn field_i64(record: &Record, name: &str) -> Option<i64> {
    let v = field_f64(record, name)?;
    if v.fract() != 0.0 || v < i64::MIN as f64 || v > i64::MAX as f64 {
        return None;
    }
    Some(v as i64)
}

/// Read a string-ish field; numbers are rendered with their JSON text.
pub fn field_str(record: &Record, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        // An empty cell is missing, not zero.
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn json_kind(value: &Value) -> &'static str {
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
pub(crate) fn records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_rejects_non_array_payloads() {
        let err = parse_records(br#"{"date": "2024-01-01"}"#).unwrap_err();
        assert_eq!(err, LoadError::Shape("an object".to_string()));

        let err = parse_records(b"[1, 2]").unwrap_err();
        assert!(matches!(err, LoadError::Shape(_)));

        let err = parse_records(b"not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn parse_accepts_empty_array() {
        assert!(parse_records(b"[]").unwrap().is_empty());
    }

    #[test]
    fn numeric_fields_coerce_like_the_browser() {
        let rows = records(json!([
            {"a": 1.5, "b": "2.25", "c": null, "d": "n/a", "e": "", "f": " 3 "}
        ]));
        let r = &rows[0];
        assert_eq!(field_f64(r, "a"), Some(1.5));
        assert_eq!(field_f64(r, "b"), Some(2.25));
        assert_eq!(field_f64(r, "c"), None);
        assert_eq!(field_f64(r, "d"), None);
        assert_eq!(field_f64(r, "e"), None);
        assert_eq!(field_f64(r, "f"), Some(3.0));
        assert_eq!(field_f64(r, "missing"), None);
    }

    #[test]
    fn integral_fields_reject_fractions() {
        let rows = records(json!([{"year": "2024", "month": 3.0, "bad": 2.5}]));
        assert_eq!(field_i64(&rows[0], "year"), Some(2024));
        assert_eq!(field_i64(&rows[0], "month"), Some(3));
        assert_eq!(field_i64(&rows[0], "bad"), None);
    }

    #[test]
    fn first_f64_falls_back_in_order() {
        let rows = records(json!([{"account_equity": 50}]));
        assert_eq!(first_f64(&rows[0], &["equity", "account_equity"]), Some(50.0));
    }
}
