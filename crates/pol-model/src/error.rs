//! Error types shared by every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed source error for backend failures (storage, HTTP, workbook).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while loading, cleaning, storing or joining data.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file does not exist.
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// File format selector or extension is not csv, excel or json.
    #[error("unsupported file type: {format}")]
    UnsupportedFormat { format: String },

    /// Malformed file content.
    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    /// Column names appear more than once.
    #[error("duplicate column names found: {columns:?}")]
    DuplicateColumns { columns: Vec<String> },

    /// A required column is absent.
    #[error("missing column {column} in {origin}")]
    MissingColumn { column: String, origin: String },

    /// Database connection or write failure.
    #[error("storage error ({context}): {source}")]
    Storage {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Remote download failure (network or non-2xx status).
    #[error("http error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Polars failure while building, joining or writing a frame.
    #[error("dataframe error ({context}): {source}")]
    Frame {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Missing or invalid configuration value.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Low-level I/O failure on a path that exists.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn parse(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    pub fn storage(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn frame(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Frame {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn http(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Http {
            url: url.into(),
            source: Box::new(source),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            origin: origin.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
