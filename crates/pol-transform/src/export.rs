use std::fs::{self, File};
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::info;

use pol_model::{PipelineError, Result};

/// Default location of the exported combined table.
pub const DEFAULT_EXPORT_PATH: &str = "output/POL_FINAL.csv";

/// Write the combined table as CSV with a header row, creating parent
/// directories as needed.
pub fn export_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut file = File::create(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|error| PipelineError::frame(format!("write {}", path.display()), error))?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "exported csv"
    );
    Ok(())
}
