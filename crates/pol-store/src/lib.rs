pub mod config;
pub mod sqlite;

pub use config::{DatabaseConfig, IN_MEMORY_ENDPOINT, REQUIRED_VARS};
pub use sqlite::{Store, quote_ident};
