//! Collect and join stages.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, info_span};

use pol_common::frame_to_dataset;
use pol_ingest::{
    CENSUS_SOURCES, DEFAULT_DATA_DIR, ELECTION_TABLE, ELECTION_URL, FileFormat, PLAIN_SOURCES,
    fetch_csv, load_data_file,
};
use pol_model::{Dataset, Result};
use pol_store::Store;

use crate::census::prepare_census;
use crate::export::export_csv;
use crate::join::build_combined;

/// Default name of the combined table.
pub const FINAL_TABLE: &str = "POL_FINAL";

/// Where the election results come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionSource {
    Url(String),
    File(PathBuf),
    Skip,
}

impl Default for ElectionSource {
    fn default() -> Self {
        Self::Url(ELECTION_URL.to_string())
    }
}

/// Run settings for the collect and join stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub election: ElectionSource,
    pub final_table: String,
    pub export_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            election: ElectionSource::default(),
            final_table: FINAL_TABLE.to_string(),
            export_path: None,
        }
    }
}

/// One table written by a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
}

fn push(store: &mut Store, table: &str, dataset: &Dataset) -> Result<TableSummary> {
    let rows = store.replace_table(table, dataset)?;
    Ok(TableSummary {
        table: table.to_string(),
        rows,
        columns: dataset.width(),
    })
}

/// Load the election results from the configured source.
pub fn load_election(source: &ElectionSource, data_dir: &Path) -> Result<Option<Dataset>> {
    match source {
        ElectionSource::Url(url) => fetch_csv(url).map(Some),
        ElectionSource::File(path) => load_data_file(data_dir, path, FileFormat::Csv).map(Some),
        ElectionSource::Skip => Ok(None),
    }
}

/// Load every source file, clean census extracts and push each table.
pub fn collect(store: &mut Store, config: &PipelineConfig) -> Result<Vec<TableSummary>> {
    let span = info_span!("collect", data_dir = %config.data_dir.display());
    let _guard = span.enter();
    let started = Instant::now();
    let mut written = Vec::new();

    if let Some(election) = load_election(&config.election, &config.data_dir)? {
        written.push(push(store, ELECTION_TABLE, &election)?);
    } else {
        info!("election download skipped");
    }

    for source in PLAIN_SOURCES {
        let dataset = load_data_file(&config.data_dir, Path::new(source.file), FileFormat::Csv)?;
        written.push(push(store, source.table, &dataset)?);
    }

    for source in CENSUS_SOURCES {
        let dataset = prepare_census(&config.data_dir, *source)?;
        written.push(push(store, source.table(), &dataset)?);
    }

    info!(
        tables = written.len(),
        duration_ms = started.elapsed().as_millis(),
        "collect complete"
    );
    Ok(written)
}

/// Join the stored tables, write the combined table and optionally export it.
pub fn join(store: &mut Store, config: &PipelineConfig) -> Result<TableSummary> {
    let span = info_span!("join", table = %config.final_table);
    let _guard = span.enter();
    let started = Instant::now();

    let mut combined = build_combined(store)?;
    let dataset = frame_to_dataset(&combined)?;
    let summary = push(store, &config.final_table, &dataset)?;
    if let Some(path) = &config.export_path {
        export_csv(&mut combined, path)?;
    }

    info!(
        rows = summary.rows,
        columns = summary.columns,
        duration_ms = started.elapsed().as_millis(),
        "join complete"
    );
    Ok(summary)
}
