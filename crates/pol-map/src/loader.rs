use std::path::Path;

use tracing::{debug, warn};

use pol_ingest::read_table_auto;
use pol_model::{ColumnMapping, Dataset, PipelineError, Result};

use crate::normalize::normalize_label;

/// Column holding the raw source identifier.
pub const RAW_NAME_COLUMN: &str = "Column Name";
/// Column holding the descriptive census label.
pub const LABEL_COLUMN: &str = "Label";

/// Load a mapping file and normalize its labels.
///
/// The format follows the file extension. Rows with a null label are
/// skipped; a later row with the same raw name replaces an earlier one.
pub fn load_column_mapping(path: &Path) -> Result<ColumnMapping> {
    let table = read_table_auto(path)?;
    let mapping = mapping_from_table(&table, &path.display().to_string())?;
    debug!(path = %path.display(), entries = mapping.len(), "loaded column mapping");
    Ok(mapping)
}

/// Build a mapping from an already-loaded `Column Name`/`Label` table.
pub fn mapping_from_table(table: &Dataset, origin: &str) -> Result<ColumnMapping> {
    let raw = table
        .column(RAW_NAME_COLUMN)
        .ok_or_else(|| PipelineError::missing_column(RAW_NAME_COLUMN, origin))?;
    let labels = table
        .column(LABEL_COLUMN)
        .ok_or_else(|| PipelineError::missing_column(LABEL_COLUMN, origin))?;

    let mut mapping = ColumnMapping::new();
    let mut skipped = 0usize;
    for (raw_name, label) in raw.values.iter().zip(&labels.values) {
        if label.is_null() || raw_name.is_null() {
            skipped += 1;
            continue;
        }
        mapping.insert(raw_name.to_string(), normalize_label(&label.to_string()));
    }
    if skipped > 0 {
        warn!(origin, skipped, "skipped mapping rows with a null label");
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pol_model::Value;

    fn table(rows: Vec<(Value, Value)>) -> Dataset {
        Dataset::from_rows(
            vec![RAW_NAME_COLUMN.to_string(), LABEL_COLUMN.to_string()],
            rows.into_iter().map(|(a, b)| vec![a, b]).collect(),
        )
    }

    #[test]
    fn normalizes_labels() {
        let mapping = mapping_from_table(
            &table(vec![(
                Value::from("S0101_C01_001E"),
                Value::from("Estimate!!Total!!Total population"),
            )]),
            "inline",
        )
        .expect("build mapping");
        assert_eq!(mapping.get("S0101_C01_001E"), Some("EST_T_T_POP"));
    }

    #[test]
    fn skips_null_labels() {
        let mapping = mapping_from_table(
            &table(vec![
                (Value::from("GEO_ID"), Value::from("Geography")),
                (Value::from("NAME"), Value::Null),
            ]),
            "inline",
        )
        .expect("build mapping");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("NAME"), None);
    }

    #[test]
    fn missing_label_column_is_reported() {
        let table = Dataset::from_rows(vec![RAW_NAME_COLUMN.to_string()], Vec::new());
        let err = mapping_from_table(&table, "inline").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingColumn { column, .. } if column == LABEL_COLUMN
        ));
    }
}
