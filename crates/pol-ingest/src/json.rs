//! JSON table reading.
//!
//! Two layouts are accepted: an array of record objects, or a
//! column-oriented object whose members are either index-keyed objects
//! (`{"col": {"0": v}}`) or plain arrays (`{"col": [v]}`).

use std::fs;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use pol_model::{Column, Dataset, PipelineError, Result, Value};

fn json_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Number(n) => match n.as_i64() {
            Some(v) => Value::Int(v),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Bool(b) => Value::Text(b.to_string()),
        other => Value::Text(other.to_string()),
    }
}

pub fn read_json_path(path: &Path) -> Result<Dataset> {
    let origin = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json_str(&text, &origin)
}

pub fn read_json_str(text: &str, origin: &str) -> Result<Dataset> {
    let root: JsonValue =
        serde_json::from_str(text).map_err(|error| PipelineError::parse(origin, error))?;
    match root {
        JsonValue::Array(records) => records_to_dataset(&records, origin),
        JsonValue::Object(columns) => columns_to_dataset(&columns, origin),
        _ => Err(PipelineError::parse(
            origin,
            "expected an array of records or an object of columns",
        )),
    }
}

fn records_to_dataset(records: &[JsonValue], origin: &str) -> Result<Dataset> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        let JsonValue::Object(fields) = record else {
            return Err(PipelineError::parse(origin, "record is not an object"));
        };
        for key in fields.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    let rows = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|key| record.get(key).map_or(Value::Null, json_value))
                .collect()
        })
        .collect();
    Ok(Dataset::from_rows(headers, rows))
}

fn columns_to_dataset(columns: &Map<String, JsonValue>, origin: &str) -> Result<Dataset> {
    let mut index: Vec<String> = Vec::new();
    for values in columns.values() {
        if let JsonValue::Object(cells) = values {
            for key in cells.keys() {
                if !index.contains(key) {
                    index.push(key.clone());
                }
            }
        }
    }
    let mut out = Vec::with_capacity(columns.len());
    for (name, values) in columns {
        let cells = match values {
            JsonValue::Array(items) => items.iter().map(json_value).collect(),
            JsonValue::Object(cells) => index
                .iter()
                .map(|key| cells.get(key).map_or(Value::Null, json_value))
                .collect(),
            _ => {
                return Err(PipelineError::parse(
                    origin,
                    format!("column {name} is neither an array nor an object"),
                ));
            }
        };
        out.push(Column::new(name.clone(), cells));
    }
    Dataset::from_columns(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_records_in_first_seen_key_order() {
        let text = r#"[{"FIPS": 6001, "state": "CA"}, {"FIPS": 6003, "share": 0.5}]"#;
        let dataset = read_json_str(text, "inline").expect("parse json");
        assert_eq!(dataset.column_names(), vec!["FIPS", "state", "share"]);
        assert_eq!(dataset.get(1, 1), Some(&Value::Null));
        assert_eq!(dataset.get(1, 2), Some(&Value::Float(0.5)));
    }

    #[test]
    fn reads_column_oriented_objects() {
        let text = r#"{"FIPS": {"0": 6001, "1": 6003}, "state": {"0": "CA"}}"#;
        let dataset = read_json_str(text, "inline").expect("parse json");
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.get(0, 1), Some(&Value::from("CA")));
        assert_eq!(dataset.get(1, 1), Some(&Value::Null));
    }

    #[test]
    fn reads_column_arrays() {
        let text = r#"{"a": [1, 2], "b": ["x", null]}"#;
        let dataset = read_json_str(text, "inline").expect("parse json");
        assert_eq!(dataset.get(1, 0), Some(&Value::Int(2)));
        assert_eq!(dataset.get(1, 1), Some(&Value::Null));
    }

    #[test]
    fn rejects_scalar_root() {
        let err = read_json_str("42", "inline").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }
}
