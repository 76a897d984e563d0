use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use pol_model::{Dataset, PipelineError, Result, Value};

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(v) => Value::Int(*v),
        Data::Float(v) => Value::Float(*v),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::Text(trimmed.to_string())
            }
        }
        other => Value::Text(other.to_string()),
    }
}

/// Read the first worksheet of a workbook; its first row is the header.
pub fn read_excel_path(path: &Path) -> Result<Dataset> {
    let origin = path.display().to_string();
    let mut workbook =
        open_workbook_auto(path).map_err(|error| PipelineError::parse(&origin, error))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::parse(&origin, "workbook has no worksheets"))?
        .map_err(|error| PipelineError::parse(&origin, error))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    let body: Vec<Vec<Value>> = rows
        .map(|row| row.iter().map(cell_value).collect())
        .filter(|row: &Vec<Value>| row.iter().any(|value| !value.is_null()))
        .collect();
    Ok(Dataset::from_rows(headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_native_cell_types() {
        assert_eq!(cell_value(&Data::Int(3)), Value::Int(3));
        assert_eq!(cell_value(&Data::Float(2.5)), Value::Float(2.5));
        assert_eq!(cell_value(&Data::String(" CA ".to_string())), Value::from("CA"));
        assert_eq!(cell_value(&Data::String(String::new())), Value::Null);
        assert_eq!(cell_value(&Data::Empty), Value::Null);
        assert_eq!(cell_value(&Data::Bool(true)), Value::from("true"));
    }
}
