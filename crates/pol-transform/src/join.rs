//! Left-join chain producing one row per county.

use std::collections::BTreeSet;
use std::time::Instant;

use polars::prelude::*;
use tracing::{info, info_span, warn};

use pol_common::{any_to_value, dataset_to_frame};
use pol_model::{Dataset, FIPS_COLUMN, PipelineError, Result};
use pol_store::Store;

use crate::transforms::DatasetKind;

const ROW_ORDER_COLUMN: &str = "__row_order";
const RIGHT_ORDER_COLUMN: &str = "__right_order";

/// Output of every per-dataset transform, ready to be joined.
#[derive(Debug, Clone, Default)]
pub struct CountyInputs {
    pub election: Dataset,
    pub fips: Dataset,
    pub education: Dataset,
    pub dem_housing: Dataset,
    pub age_sex: Dataset,
    pub income: Dataset,
    pub occupation: Dataset,
}

impl CountyInputs {
    /// Run all seven transforms against the store.
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self {
            election: DatasetKind::Election.run(store)?,
            fips: DatasetKind::Fips.run(store)?,
            education: DatasetKind::Education.run(store)?,
            dem_housing: DatasetKind::DemHousing.run(store)?,
            age_sex: DatasetKind::AgeSex.run(store)?,
            income: DatasetKind::Income.run(store)?,
            occupation: DatasetKind::Occupation.run(store)?,
        })
    }

    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        match kind {
            DatasetKind::Election => &self.election,
            DatasetKind::Fips => &self.fips,
            DatasetKind::Education => &self.education,
            DatasetKind::DemHousing => &self.dem_housing,
            DatasetKind::AgeSex => &self.age_sex,
            DatasetKind::Income => &self.income,
            DatasetKind::Occupation => &self.occupation,
        }
    }
}

/// Convert a transform output to a frame with an `Int64` FIPS key.
fn keyed_frame(kind: DatasetKind, dataset: &Dataset) -> Result<DataFrame> {
    if dataset.column(FIPS_COLUMN).is_none() {
        return Err(PipelineError::missing_column(FIPS_COLUMN, kind.name()));
    }
    let df = dataset_to_frame(dataset)?;
    df.lazy()
        .with_column(col(FIPS_COLUMN).cast(DataType::Int64))
        .collect()
        .map_err(|error| PipelineError::frame(format!("cast {} key", kind.name()), error))
}

/// Append `_<dataset>` to right-side columns whose names match an already
/// joined column, ignoring ASCII case since the store treats `County` and
/// `county` as the same column.
fn suffix_clashing_columns(
    combined: &DataFrame,
    right: &mut DataFrame,
    kind: DatasetKind,
) -> Result<()> {
    let taken: BTreeSet<String> = combined
        .get_column_names()
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();
    for name in right.get_column_names_owned() {
        if name.as_str() == FIPS_COLUMN || !taken.contains(&name.to_ascii_lowercase()) {
            continue;
        }
        let renamed = format!("{name}_{}", kind.name());
        right
            .rename(name.as_str(), renamed.into())
            .map_err(|error| PipelineError::frame(format!("rename {name}"), error))?;
    }
    Ok(())
}

/// Left-join the transform outputs in [`DatasetKind::JOIN_ORDER`] and keep
/// the first row for each FIPS.
///
/// Rows stay in election-table order; when a county matches several
/// right-side rows they follow that table's order. Right-side columns whose
/// names clash with columns already joined get a `_<dataset>` suffix.
pub fn join_counties(inputs: &CountyInputs) -> Result<DataFrame> {
    let span = info_span!("join_chain");
    let _guard = span.enter();

    let base = DatasetKind::JOIN_ORDER[0];
    let mut combined = keyed_frame(base, inputs.get(base))?
        .with_row_index(ROW_ORDER_COLUMN.into(), None)
        .map_err(|error| PipelineError::frame("index election rows", error))?;
    info!(
        dataset = base.name(),
        rows = combined.height(),
        columns = combined.width() - 1,
        "join base"
    );

    for kind in &DatasetKind::JOIN_ORDER[1..] {
        let started = Instant::now();
        let mut right = keyed_frame(*kind, inputs.get(*kind))?;
        suffix_clashing_columns(&combined, &mut right, *kind)?;
        let right = right
            .with_row_index(RIGHT_ORDER_COLUMN.into(), None)
            .map_err(|error| PipelineError::frame(format!("index {} rows", kind.name()), error))?;
        let rows_before = combined.height();
        let right_rows = right.height();
        let args = JoinArgs::new(JoinType::Left)
            .with_suffix(Some(format!("_{}", kind.name()).into()));
        combined = combined
            .lazy()
            .join(right.lazy(), [col(FIPS_COLUMN)], [col(FIPS_COLUMN)], args)
            .collect()
            .and_then(|joined| {
                joined.sort(
                    [ROW_ORDER_COLUMN, RIGHT_ORDER_COLUMN],
                    SortMultipleOptions::default().with_maintain_order(true),
                )
            })
            .and_then(|joined| joined.drop(RIGHT_ORDER_COLUMN))
            .map_err(|error| PipelineError::frame(format!("join {}", kind.name()), error))?;
        if combined.height() != rows_before {
            warn!(
                dataset = kind.name(),
                rows_before,
                rows_after = combined.height(),
                "join produced duplicate counties"
            );
        }
        info!(
            dataset = kind.name(),
            rows_before,
            right_rows,
            rows_after = combined.height(),
            columns = combined.width() - 1,
            duration_ms = started.elapsed().as_millis(),
            "joined dataset"
        );
    }

    let ordered = combined
        .drop(ROW_ORDER_COLUMN)
        .map_err(|error| PipelineError::frame("drop row order", error))?;
    let deduped = dedupe_by_fips(&ordered)?;
    info!(
        rows_before = ordered.height(),
        rows_after = deduped.height(),
        columns = deduped.width(),
        "deduplicated by FIPS"
    );
    Ok(deduped)
}

/// Keep the first row for each FIPS value. Rows with a null key are
/// treated as one key.
pub fn dedupe_by_fips(df: &DataFrame) -> Result<DataFrame> {
    let key = df
        .column(FIPS_COLUMN)
        .map_err(|_| PipelineError::missing_column(FIPS_COLUMN, "combined table"))?;
    let mut seen: BTreeSet<Option<i64>> = BTreeSet::new();
    let keep: Vec<bool> = (0..df.height())
        .map(|idx| {
            let value = any_to_value(key.get(idx).unwrap_or(AnyValue::Null));
            seen.insert(value.as_i64())
        })
        .collect();
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    df.filter(&mask)
        .map_err(|error| PipelineError::frame("deduplicate", error))
}

/// Run every transform, join the results and return the combined table.
pub fn build_combined(store: &Store) -> Result<DataFrame> {
    let inputs = CountyInputs::load(store)?;
    join_counties(&inputs)
}
