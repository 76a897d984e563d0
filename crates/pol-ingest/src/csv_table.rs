//! CSV reading with per-column type inference.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use pol_model::{Column, Dataset, PipelineError, Result, Value};

/// Cell spellings that load as null.
pub const NA_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A"];

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn is_na(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// Read a CSV file into a dataset. The first record is the header.
pub fn read_csv_path(path: &Path) -> Result<Dataset> {
    let origin = path.display().to_string();
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|error| PipelineError::parse(&origin, error))?;
    read_records(reader, &origin)
}

/// Parse CSV text already held in memory, such as an HTTP body.
pub fn read_csv_str(text: &str, origin: &str) -> Result<Dataset> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    read_records(reader, origin)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> Result<Dataset> {
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| PipelineError::parse(origin, error))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut rows = raw_rows.into_iter();
    let Some(headers) = rows.next() else {
        return Ok(Dataset::new());
    };
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for row in rows {
        let mut values = row.into_iter();
        for column in &mut cells {
            column.push(values.next().unwrap_or_default());
        }
    }
    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::new(name, infer_column(&raw)))
        .collect();
    Dataset::from_columns(columns)
}

/// Type a column of raw cells: all integers, else all floats, else text.
/// NA tokens become null in every case.
pub fn infer_column(raw: &[String]) -> Vec<Value> {
    let present = || raw.iter().filter(|cell| !is_na(cell));
    if present().all(|cell| cell.parse::<i64>().is_ok()) {
        return raw
            .iter()
            .map(|cell| cell.parse::<i64>().map_or(Value::Null, Value::Int))
            .collect();
    }
    if present().all(|cell| cell.parse::<f64>().is_ok()) {
        return raw
            .iter()
            .map(|cell| {
                if is_na(cell) {
                    Value::Null
                } else {
                    cell.parse::<f64>().map_or(Value::Null, Value::Float)
                }
            })
            .collect();
    }
    raw.iter()
        .map(|cell| {
            if is_na(cell) {
                Value::Null
            } else {
                Value::Text(cell.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_types_per_column() {
        let text = "\u{feff}FIPS,share,name\n06001,0.5,Alameda\n6003,NA,\n";
        let dataset = read_csv_str(text, "inline").expect("parse csv");
        assert_eq!(dataset.column_names(), vec!["FIPS", "share", "name"]);
        assert_eq!(
            dataset.column("FIPS").unwrap().values,
            vec![Value::Int(6001), Value::Int(6003)]
        );
        assert_eq!(
            dataset.column("share").unwrap().values,
            vec![Value::Float(0.5), Value::Null]
        );
        assert_eq!(
            dataset.column("name").unwrap().values,
            vec![Value::from("Alameda"), Value::Null]
        );
    }

    #[test]
    fn pads_short_rows_and_skips_blank_lines() {
        let text = "a,b,c\n1,2\n\n4,5,6,7\n";
        let dataset = read_csv_str(text, "inline").expect("parse csv");
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.get(0, 2), Some(&Value::Null));
        assert_eq!(dataset.get(1, 2), Some(&Value::Int(6)));
    }

    #[test]
    fn header_only_input_gives_empty_columns() {
        let dataset = read_csv_str("a,b\n", "inline").expect("parse csv");
        assert_eq!(dataset.width(), 2);
        assert_eq!(dataset.height(), 0);
    }
}
