//! Loading listing batches from JSON.
//!
//! Accepted documents:
//! - a bare array: `[{...}, {...}]`
//! - an API envelope with the array under `data` or `posts`: `{"data": [...]}`

use crate::error::{RecordsError, Result};
use crate::types::ListRecord;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Keys checked, in order, when the document is an object.
const ENVELOPE_KEYS: &[&str] = &["data", "posts"];

/// Parse a batch of records from JSON text.
pub fn parse_records(json: &str) -> Result<Vec<ListRecord>> {
    let document: Value = serde_json::from_str(json)?;
    records_from_value(document)
}

/// Decode a batch of records from an already parsed JSON document.
pub fn records_from_value(document: Value) -> Result<Vec<ListRecord>> {
    let array = match document {
        Value::Array(_) => document,
        Value::Object(mut object) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(value @ Value::Array(_)) => Some(value),
                _ => None,
            })
            .ok_or_else(|| {
                RecordsError::InvalidShape(format!(
                    "expected an array under one of {:?}",
                    ENVELOPE_KEYS
                ))
            })?,
        other => {
            return Err(RecordsError::InvalidShape(format!(
                "expected an array of records, found {}",
                kind_of(&other)
            )));
        }
    };

    Ok(serde_json::from_value(array)?)
}

/// Load a batch of records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<ListRecord>> {
    let json = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => RecordsError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => RecordsError::IoError(err),
    })?;
    parse_records(&json)
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

    #[test]
    fn test_parse_bare_array() {
        let records = parse_records(r#"[{"title": "Logo Design"}, {"title": "3D Model"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title_text().as_deref(), Some("3D Model"));
    }

    #[test]
    fn test_parse_envelope() {
        let records = parse_records(r#"{"success": true, "data": [{"title": "A"}]}"#).unwrap();
        assert_eq!(records.len(), 1);

        let records = parse_records(r#"{"posts": [{"title": "A"}, {"title": "B"}]}"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let err = parse_records(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, RecordsError::InvalidShape(_)));

        let err = parse_records("42").unwrap_err();
        assert!(err.to_string().contains("a number"));

        let err = parse_records("[{").unwrap_err();
        assert!(matches!(err, RecordsError::JsonError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_records(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, RecordsError::FileNotFound { .. }));
    }
}
