pub mod dataset;
pub mod error;
pub mod mapping;
pub mod value;

pub use dataset::{Column, ColumnKind, Dataset};
pub use error::{BoxError, PipelineError, Result};
pub use mapping::ColumnMapping;
pub use value::Value;

/// Name of the county join key every per-dataset table exposes.
pub const FIPS_COLUMN: &str = "FIPS";
