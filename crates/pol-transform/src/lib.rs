pub mod census;
pub mod clean;
pub mod export;
pub mod join;
pub mod pipeline;
pub mod transforms;

pub use census::{CensusDataset, prepare_census};
pub use clean::{
    DEFAULT_NUMERIC_EXCLUSIONS, apply_mapping, coerce_numeric, detect_duplicate_columns,
    drop_duplicate_columns, ensure_unique_columns, replace_values,
};
pub use export::{DEFAULT_EXPORT_PATH, export_csv};
pub use join::{CountyInputs, build_combined, dedupe_by_fips, join_counties};
pub use pipeline::{
    ElectionSource, FINAL_TABLE, PipelineConfig, TableSummary, collect, join, load_election,
};
pub use transforms::DatasetKind;
