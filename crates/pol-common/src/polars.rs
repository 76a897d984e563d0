//! Polars conversion helpers.
//!
//! The pipeline keeps datasets in [`pol_model::Dataset`] while they may still
//! carry duplicate column names, and hands them to Polars only for the join
//! stage and the CSV export, where names are already unique.

use polars::prelude::*;

use pol_model::{ColumnKind, Dataset, PipelineError, Result, Value};

/// Converts a Polars `AnyValue` to a dataset [`Value`].
///
/// Integer types become `Int` (unsigned values beyond `i64` fall back to
/// `Float`), floats become `Float`, strings become `Text`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use pol_common::any_to_value;
/// use pol_model::Value;
///
/// assert_eq!(any_to_value(AnyValue::Null), Value::Null);
/// assert_eq!(any_to_value(AnyValue::Int32(42)), Value::Int(42));
/// assert_eq!(any_to_value(AnyValue::String("CA")), Value::from("CA"));
/// ```
pub fn any_to_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Int8(v) => Value::Int(i64::from(v)),
        AnyValue::Int16(v) => Value::Int(i64::from(v)),
        AnyValue::Int32(v) => Value::Int(i64::from(v)),
        AnyValue::Int64(v) => Value::Int(v),
        AnyValue::UInt8(v) => Value::Int(i64::from(v)),
        AnyValue::UInt16(v) => Value::Int(i64::from(v)),
        AnyValue::UInt32(v) => Value::Int(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Float(v as f64),
        },
        AnyValue::Float32(v) => Value::Float(f64::from(v)),
        AnyValue::Float64(v) => Value::Float(v),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        AnyValue::Boolean(b) => Value::Text(b.to_string()),
        other => Value::Text(other.to_string()),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use pol_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Float(v) => Some(format_numeric(*v)),
        other => Some(other.to_string()),
    }
}

/// Build a Polars `DataFrame` from a dataset.
///
/// Integer columns become `Int64`, float columns `Float64`; text, mixed and
/// all-null columns become `String`. Fails on duplicate column names.
pub fn dataset_to_frame(dataset: &Dataset) -> Result<DataFrame> {
    let duplicates = dataset.duplicate_column_names();
    if !duplicates.is_empty() {
        return Err(PipelineError::DuplicateColumns {
            columns: duplicates,
        });
    }
    let columns: Vec<Column> = dataset
        .columns()
        .iter()
        .map(|column| {
            let name: PlSmallStr = column.name.as_str().into();
            let series = match column.kind() {
                ColumnKind::Int => Series::new(
                    name,
                    column
                        .values
                        .iter()
                        .map(Value::as_i64)
                        .collect::<Vec<Option<i64>>>(),
                ),
                ColumnKind::Float => Series::new(
                    name,
                    column
                        .values
                        .iter()
                        .map(Value::as_f64)
                        .collect::<Vec<Option<f64>>>(),
                ),
                ColumnKind::Text | ColumnKind::Mixed | ColumnKind::Empty => Series::new(
                    name,
                    column
                        .values
                        .iter()
                        .map(value_text)
                        .collect::<Vec<Option<String>>>(),
                ),
            };
            series.into_column()
        })
        .collect();
    DataFrame::new(columns).map_err(|error| PipelineError::frame("build frame", error))
}

/// Convert a Polars `DataFrame` back into a dataset, preserving column order.
pub fn frame_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let height = df.height();
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let values = (0..height)
                .map(|idx| any_to_value(column.get(idx).unwrap_or(AnyValue::Null)))
                .collect();
            pol_model::Column::new(column.name().as_str(), values)
        })
        .collect();
    pol_model::Dataset::from_columns(columns)
}
