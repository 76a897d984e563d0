//! Database connection configuration.

use std::fmt;
use std::path::PathBuf;

use pol_model::{PipelineError, Result};

/// Environment variables that must all be set.
pub const REQUIRED_VARS: [&str; 6] = ["ENDPOINT", "PORT", "USER", "REGION", "PASSWORD", "DBNAME"];

/// `ENDPOINT` value that selects a private in-memory database.
pub const IN_MEMORY_ENDPOINT: &str = ":memory:";

/// Connection settings, constructed once and passed to the store.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub endpoint: String,
    pub port: u16,
    pub user: String,
    pub region: String,
    pub password: String,
    pub dbname: String,
}

impl DatabaseConfig {
    /// Read the configuration from the process environment, loading a
    /// `.env` file first when one is present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| lookup(key).is_none_or(|value| value.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        let get = |key: &str| lookup(key).unwrap_or_default().trim().to_string();
        let port_raw = get("PORT");
        let port = port_raw.parse::<u16>().map_err(|_| {
            PipelineError::config(format!("PORT must be a port number, got {port_raw:?}"))
        })?;
        Ok(Self {
            endpoint: get("ENDPOINT"),
            port,
            user: get("USER"),
            region: get("REGION"),
            password: get("PASSWORD"),
            dbname: get("DBNAME"),
        })
    }

    /// Database file location, or `None` for an in-memory database.
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.endpoint == IN_MEMORY_ENDPOINT {
            None
        } else {
            Some(PathBuf::from(&self.endpoint).join(format!("{}.sqlite3", self.dbname)))
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("region", &self.region)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}
