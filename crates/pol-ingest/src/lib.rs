pub mod csv_table;
pub mod excel;
pub mod format;
pub mod json;
pub mod loader;
pub mod remote;
pub mod sources;

pub use csv_table::{NA_TOKENS, read_csv_path, read_csv_str};
pub use excel::read_excel_path;
pub use format::FileFormat;
pub use json::{read_json_path, read_json_str};
pub use loader::{DEFAULT_DATA_DIR, load_data_file, read_table, read_table_auto, resolve_path};
pub use remote::{ELECTION_URL, fetch_csv};
pub use sources::{CENSUS_SOURCES, CensusSource, ELECTION_TABLE, PLAIN_SOURCES, PlainSource};
