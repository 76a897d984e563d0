use std::path::{Path, PathBuf};

use tracing::debug;

use pol_model::{Dataset, PipelineError, Result};

use crate::csv_table::read_csv_path;
use crate::excel::read_excel_path;
use crate::format::FileFormat;
use crate::json::read_json_path;

/// Directory relative input paths are resolved against.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Resolve `path` against `data_dir` unless it is already absolute.
pub fn resolve_path(data_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

/// Load a file into memory as a dataset using the given format.
pub fn read_table(path: &Path, format: FileFormat) -> Result<Dataset> {
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let dataset = match format {
        FileFormat::Csv => read_csv_path(path)?,
        FileFormat::Excel => read_excel_path(path)?,
        FileFormat::Json => read_json_path(path)?,
    };
    debug!(
        path = %path.display(),
        format = %format,
        rows = dataset.height(),
        columns = dataset.width(),
        "loaded table"
    );
    Ok(dataset)
}

/// Load a file, inferring the format from its extension.
pub fn read_table_auto(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            path: path.to_path_buf(),
        });
    }
    read_table(path, FileFormat::from_path(path)?)
}

/// Resolve a data-directory-relative path and load it.
pub fn load_data_file(data_dir: &Path, path: &Path, format: FileFormat) -> Result<Dataset> {
    read_table(&resolve_path(data_dir, path), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_paths_against_data_dir() {
        let resolved = resolve_path(Path::new("data"), Path::new("FIPS.csv"));
        assert_eq!(resolved, PathBuf::from("data/FIPS.csv"));
        let absolute = resolve_path(Path::new("data"), Path::new("/tmp/FIPS.csv"));
        assert_eq!(absolute, PathBuf::from("/tmp/FIPS.csv"));
    }
}
