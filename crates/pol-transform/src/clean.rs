//! Dataset cleaning steps applied to census extracts before storage.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use pol_model::{ColumnMapping, Dataset, PipelineError, Result, Value};

/// Columns left as text by [`coerce_numeric`] unless the caller says otherwise.
pub const DEFAULT_NUMERIC_EXCLUSIONS: &[&str] = &["Geography", "Geographic_Area_Name"];

/// Rename mapped columns, then drop the first data row.
///
/// Census extracts carry a second header line (the long labels) as row 0,
/// so the row is removed whether or not a mapping is available. Each call
/// drops one more row. Returns the number of renamed columns.
pub fn apply_mapping(dataset: &mut Dataset, mapping: Option<&ColumnMapping>) -> usize {
    let mut renamed = 0usize;
    match mapping {
        Some(mapping) => {
            for column in dataset.columns_mut() {
                if let Some(target) = mapping.get(&column.name) {
                    if column.name != target {
                        column.name = target.to_string();
                    }
                    renamed += 1;
                }
            }
        }
        None => warn!("no column mapping loaded; column names left unchanged"),
    }
    if mapping.is_some_and(ColumnMapping::is_empty) {
        warn!("column mapping is empty; column names left unchanged");
    }
    dataset.remove_row(0);
    debug!(renamed, rows = dataset.height(), "applied column mapping");
    renamed
}

/// Names appearing more than once, in order of first appearance.
pub fn detect_duplicate_columns(dataset: &Dataset) -> Vec<String> {
    dataset.duplicate_column_names()
}

/// Fail with [`PipelineError::DuplicateColumns`] when any name repeats.
pub fn ensure_unique_columns(dataset: &Dataset) -> Result<()> {
    let columns = detect_duplicate_columns(dataset);
    if columns.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::DuplicateColumns { columns })
    }
}

/// Keep the leftmost column of every repeated name, comparing names
/// without ASCII case. Returns how many columns were removed.
pub fn drop_duplicate_columns(dataset: &mut Dataset) -> usize {
    let mut seen = BTreeSet::new();
    let keep: Vec<bool> = dataset
        .columns()
        .iter()
        .map(|column| seen.insert(column.name.to_ascii_lowercase()))
        .collect();
    let removed = keep.iter().filter(|flag| !**flag).count();
    if removed > 0 {
        warn!(
            removed,
            duplicates = ?detect_duplicate_columns(dataset),
            "dropping duplicate columns"
        );
        dataset.retain_columns(&keep);
    }
    removed
}

/// Parse every value of every non-excluded, non-numeric column as a
/// number. Values that do not parse become null. Returns the number of
/// columns converted.
pub fn coerce_numeric(dataset: &mut Dataset, exclude: &[&str]) -> usize {
    let mut converted = 0usize;
    for column in dataset.columns_mut() {
        if exclude.contains(&column.name.as_str()) || column.kind().is_numeric() {
            continue;
        }
        for value in &mut column.values {
            if let Value::Text(text) = value {
                *value = Value::parse_numeric(text);
            }
        }
        converted += 1;
    }
    debug!(converted, "coerced columns to numeric");
    converted
}

/// Replace exact text matches in one column. Returns the number of cells
/// changed; a missing column changes nothing.
pub fn replace_values(dataset: &mut Dataset, column: &str, pairs: &[(&str, &str)]) -> usize {
    let Some(column) = dataset.column_mut(column) else {
        return 0;
    };
    let mut changed = 0usize;
    for value in &mut column.values {
        let Some(text) = value.as_str() else {
            continue;
        };
        if let Some((_, to)) = pairs.iter().find(|(from, _)| *from == text) {
            *value = Value::from(*to);
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census() -> Dataset {
        Dataset::from_rows(
            vec![
                "GEO_ID".to_string(),
                "NAME".to_string(),
                "S0101_C01_001E".to_string(),
                "S0101_C01_002E".to_string(),
            ],
            vec![
                vec![
                    Value::from("Geography"),
                    Value::from("Geographic Area Name"),
                    Value::from("Estimate!!Total"),
                    Value::from("Estimate!!Total"),
                ],
                vec![
                    Value::from("0500000US06001"),
                    Value::from("Alameda County, California"),
                    Value::from("1671329"),
                    Value::from("(X)"),
                ],
            ],
        )
    }

    fn mapping() -> ColumnMapping {
        [
            ("GEO_ID", "Geography"),
            ("NAME", "Geographic_Area_Name"),
            ("S0101_C01_001E", "EST_T"),
            ("S0101_C01_002E", "EST_T"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn apply_mapping_renames_and_drops_label_row() {
        let mut dataset = census();
        let renamed = apply_mapping(&mut dataset, Some(&mapping()));
        assert_eq!(renamed, 4);
        assert_eq!(dataset.height(), 1);
        assert_eq!(
            dataset.column_names(),
            vec!["Geography", "Geographic_Area_Name", "EST_T", "EST_T"]
        );
    }

    #[test]
    fn apply_mapping_without_mapping_still_drops_row() {
        let mut dataset = census();
        apply_mapping(&mut dataset, None);
        assert_eq!(dataset.height(), 1);
        assert_eq!(dataset.column_names()[0], "GEO_ID");
    }

    #[test]
    fn apply_mapping_with_empty_mapping_still_drops_row() {
        let mut dataset = census();
        let renamed = apply_mapping(&mut dataset, Some(&ColumnMapping::new()));
        assert_eq!(renamed, 0);
        assert_eq!(dataset.height(), 1);
        assert_eq!(dataset.column_names()[1], "NAME");
    }

    #[test]
    fn duplicates_differing_in_case_keep_leftmost() {
        let mut dataset = Dataset::from_rows(
            vec!["County".to_string(), "FIPS".to_string(), "county".to_string()],
            vec![vec![Value::from("Alameda"), Value::Int(6001), Value::from("alameda")]],
        );
        assert!(matches!(
            ensure_unique_columns(&dataset),
            Err(PipelineError::DuplicateColumns { columns }) if columns == vec!["County", "county"]
        ));
        assert_eq!(drop_duplicate_columns(&mut dataset), 1);
        assert_eq!(dataset.column_names(), vec!["County", "FIPS"]);
        assert_eq!(dataset.get(0, 0), Some(&Value::from("Alameda")));
    }

    #[test]
    fn duplicates_keep_leftmost() {
        let mut dataset = census();
        apply_mapping(&mut dataset, Some(&mapping()));
        assert!(matches!(
            ensure_unique_columns(&dataset),
            Err(PipelineError::DuplicateColumns { columns }) if columns == vec!["EST_T"]
        ));
        assert_eq!(drop_duplicate_columns(&mut dataset), 1);
        assert_eq!(dataset.width(), 3);
        assert_eq!(dataset.get(0, 2), Some(&Value::from("1671329")));
        assert!(ensure_unique_columns(&dataset).is_ok());
    }

    #[test]
    fn coerce_numeric_nulls_unparseable_values() {
        let mut dataset = census();
        apply_mapping(&mut dataset, Some(&mapping()));
        drop_duplicate_columns(&mut dataset);
        coerce_numeric(&mut dataset, DEFAULT_NUMERIC_EXCLUSIONS);
        assert_eq!(dataset.get(0, 0), Some(&Value::from("0500000US06001")));
        assert_eq!(dataset.get(0, 2), Some(&Value::Int(1_671_329)));

        let mut flags = Dataset::from_rows(
            vec!["x".to_string()],
            vec![vec![Value::from("(X)")], vec![Value::from("2.5")]],
        );
        coerce_numeric(&mut flags, &[]);
        assert_eq!(
            flags.column("x").unwrap().values,
            vec![Value::Null, Value::Float(2.5)]
        );

        let mut tokens = Dataset::from_rows(
            vec!["y".to_string()],
            vec![
                vec![Value::from("NaN")],
                vec![Value::from("inf")],
                vec![Value::from("-")],
            ],
        );
        coerce_numeric(&mut tokens, &[]);
        assert_eq!(
            tokens.column("y").unwrap().values,
            vec![Value::Null, Value::Float(f64::INFINITY), Value::Null]
        );
    }

    #[test]
    fn replace_values_only_touches_exact_matches() {
        let mut dataset = Dataset::from_rows(
            vec!["2016_winner".to_string()],
            vec![
                vec![Value::from("Trump")],
                vec![Value::from("Clinton")],
                vec![Value::from("Trumpet")],
                vec![Value::Null],
            ],
        );
        let changed = replace_values(
            &mut dataset,
            "2016_winner",
            &[("Trump", "REP"), ("Clinton", "DEM")],
        );
        assert_eq!(changed, 2);
        assert_eq!(
            dataset.column("2016_winner").unwrap().values,
            vec![
                Value::from("REP"),
                Value::from("DEM"),
                Value::from("Trumpet"),
                Value::Null
            ]
        );
        assert_eq!(replace_values(&mut dataset, "missing", &[("a", "b")]), 0);
    }
}
