//! Census extract loading and cleaning.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span};

use pol_ingest::{CensusSource, FileFormat, load_data_file, resolve_path};
use pol_map::load_column_mapping;
use pol_model::{ColumnMapping, Dataset, Result};

use crate::clean::{
    DEFAULT_NUMERIC_EXCLUSIONS, apply_mapping, coerce_numeric, drop_duplicate_columns,
};

/// A census extract together with the column mapping loaded for it.
#[derive(Debug, Clone)]
pub struct CensusDataset {
    pub name: String,
    pub data: Dataset,
    pub mapping: Option<ColumnMapping>,
}

impl CensusDataset {
    pub fn new(name: impl Into<String>, data: Dataset) -> Self {
        Self {
            name: name.into(),
            data,
            mapping: None,
        }
    }

    /// Load `<name>.csv` from the data directory. The mapping is not loaded.
    pub fn load(data_dir: &Path, source: CensusSource) -> Result<Self> {
        let data = load_data_file(data_dir, &source.data_file(), FileFormat::Csv)?;
        Ok(Self::new(source.name, data))
    }

    /// Load and normalize the mapping file for this extract.
    pub fn load_mapping(&mut self, path: &Path) -> Result<&ColumnMapping> {
        let mapping = load_column_mapping(path)?;
        Ok(self.mapping.insert(mapping))
    }

    pub fn apply_mapping(&mut self) -> usize {
        apply_mapping(&mut self.data, self.mapping.as_ref())
    }

    /// Rename, drop the label row, drop duplicate columns and coerce every
    /// non-key column to numeric.
    pub fn clean(&mut self) -> &Dataset {
        self.apply_mapping();
        drop_duplicate_columns(&mut self.data);
        coerce_numeric(&mut self.data, DEFAULT_NUMERIC_EXCLUSIONS);
        &self.data
    }

    pub fn into_dataset(self) -> Dataset {
        self.data
    }
}

/// Load, map and clean one census source from `data_dir`.
pub fn prepare_census(data_dir: &Path, source: CensusSource) -> Result<Dataset> {
    let span = info_span!("census", name = source.name);
    let _guard = span.enter();
    let started = Instant::now();

    let mut census = CensusDataset::load(data_dir, source)?;
    census.load_mapping(&resolve_path(data_dir, &source.mapping_file()))?;
    let raw_columns = census.data.width();
    census.clean();

    info!(
        raw_columns,
        columns = census.data.width(),
        rows = census.data.height(),
        duration_ms = started.elapsed().as_millis(),
        "cleaned census extract"
    );
    Ok(census.into_dataset())
}
