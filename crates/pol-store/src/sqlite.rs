use std::fs;
use std::time::Instant;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, info};

use pol_model::{Column, ColumnKind, Dataset, PipelineError, Result, Value};

use crate::config::DatabaseConfig;

/// Quote an identifier for use in SQL text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Int => "INTEGER",
        ColumnKind::Float => "REAL",
        ColumnKind::Text | ColumnKind::Mixed | ColumnKind::Empty => "TEXT",
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Int(v) => SqlValue::Integer(*v),
        Value::Float(v) => SqlValue::Real(*v),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Relational store holding every pipeline table.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database described by `config`.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        info!(
            endpoint = %config.endpoint,
            port = config.port,
            user = %config.user,
            region = %config.region,
            dbname = %config.dbname,
            "connecting to database"
        );
        let conn = match config.database_path() {
            None => Connection::open_in_memory(),
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|error| {
                        PipelineError::storage(format!("create {}", parent.display()), error)
                    })?;
                }
                Connection::open(&path)
            }
        }
        .map_err(|error| PipelineError::storage("open database", error))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|error| PipelineError::storage("open database", error))?;
        Ok(Self { conn })
    }

    /// Write `dataset` as table `name`, dropping any existing table first.
    ///
    /// Drop, create and insert run in one transaction. Returns the number of
    /// rows written.
    pub fn replace_table(&mut self, name: &str, dataset: &Dataset) -> Result<usize> {
        let duplicates = dataset.duplicate_column_names();
        if !duplicates.is_empty() {
            return Err(PipelineError::DuplicateColumns {
                columns: duplicates,
            });
        }
        if dataset.width() == 0 {
            return Err(PipelineError::storage(
                format!("create {name}"),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "dataset has no columns"),
            ));
        }
        let started = Instant::now();
        let context = |action: &str| format!("{action} {name}");
        let table = quote_ident(name);
        let definitions: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| format!("{} {}", quote_ident(&column.name), sql_type(column.kind())))
            .collect();
        let placeholders = vec!["?"; dataset.width()].join(", ");

        let tx = self
            .conn
            .transaction()
            .map_err(|error| PipelineError::storage(context("begin"), error))?;
        tx.execute(&format!("DROP TABLE IF EXISTS {table}"), [])
            .map_err(|error| PipelineError::storage(context("drop"), error))?;
        tx.execute(
            &format!("CREATE TABLE {table} ({})", definitions.join(", ")),
            [],
        )
        .map_err(|error| PipelineError::storage(context("create"), error))?;
        {
            let mut insert = tx
                .prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))
                .map_err(|error| PipelineError::storage(context("prepare insert"), error))?;
            for row in 0..dataset.height() {
                insert
                    .execute(params_from_iter(dataset.row(row).map(to_sql)))
                    .map_err(|error| PipelineError::storage(context("insert into"), error))?;
            }
        }
        tx.commit()
            .map_err(|error| PipelineError::storage(context("commit"), error))?;

        info!(
            table = %name,
            rows = dataset.height(),
            columns = dataset.width(),
            duration_ms = started.elapsed().as_millis(),
            "replaced table"
        );
        Ok(dataset.height())
    }

    /// Run a read-only query and collect its result set.
    pub fn query(&self, sql: &str) -> Result<Dataset> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|error| PipelineError::storage("prepare query", error))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column::new(name, Vec::new()))
            .collect();
        let mut rows = stmt
            .query([])
            .map_err(|error| PipelineError::storage("run query", error))?;
        while let Some(row) = rows
            .next()
            .map_err(|error| PipelineError::storage("read row", error))?
        {
            for (idx, column) in columns.iter_mut().enumerate() {
                let value = row
                    .get_ref(idx)
                    .map_err(|error| PipelineError::storage("read value", error))?;
                column.values.push(from_sql(value));
            }
        }
        let dataset = Dataset::from_columns(columns)?;
        debug!(rows = dataset.height(), columns = dataset.width(), "query finished");
        Ok(dataset)
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .map_err(|error| PipelineError::storage(format!("lookup {name}"), error))?;
        Ok(count > 0)
    }

    pub fn row_count(&self, name: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(name)), [], |row| {
                row.get(0)
            })
            .map_err(|error| PipelineError::storage(format!("count {name}"), error))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
