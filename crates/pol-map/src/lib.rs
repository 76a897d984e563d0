pub mod loader;
pub mod normalize;

pub use loader::{LABEL_COLUMN, RAW_NAME_COLUMN, load_column_mapping, mapping_from_table};
pub use normalize::{REPLACEMENTS, normalize_label};
