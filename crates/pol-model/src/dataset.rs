//! In-memory tabular dataset.
//!
//! A [`Dataset`] is an ordered list of named columns of equal length. Column
//! names are not required to be unique: raw census files frequently map two
//! source columns onto the same label, and the cleaner decides what to do
//! about that before anything is written out.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::value::Value;

/// Storage class of a column, derived from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every value is null.
    Empty,
    Int,
    /// Numeric with at least one float.
    Float,
    Text,
    /// Numbers and text mixed.
    Mixed,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn kind(&self) -> ColumnKind {
        let mut ints = false;
        let mut floats = false;
        let mut text = false;
        for value in &self.values {
            match value {
                Value::Null => {}
                Value::Int(_) => ints = true,
                Value::Float(_) => floats = true,
                Value::Text(_) => text = true,
            }
        }
        match (ints || floats, text) {
            (false, false) => ColumnKind::Empty,
            (true, true) => ColumnKind::Mixed,
            (false, true) => ColumnKind::Text,
            (true, false) if floats => ColumnKind::Float,
            (true, false) => ColumnKind::Int,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    height: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from columns, rejecting ragged input.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|column| column.len() != height) {
            return Err(PipelineError::parse(
                "dataset",
                format!(
                    "column {} has {} values, expected {height}",
                    bad.name,
                    bad.len()
                ),
            ));
        }
        Ok(Self { columns, height })
    }

    /// Build a dataset from a header row and value rows. Short rows are
    /// padded with nulls, long rows are truncated to the header width.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let height = rows.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(height)))
            .collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.values.push(cells.next().unwrap_or_default());
            }
        }
        Self { columns, height }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// First column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    /// Value at `(row, column index)`.
    pub fn get(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns.get(column)?.values.get(row)
    }

    /// Iterate the cells of one row in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns
            .iter()
            .map(move |column| column.values.get(index).unwrap_or(&Value::Null))
    }

    /// Remove the row at `index`. Returns false when out of range.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if index >= self.height {
            return false;
        }
        for column in &mut self.columns {
            column.values.remove(index);
        }
        self.height -= 1;
        true
    }

    /// Keep only the columns whose mask entry is true.
    pub fn retain_columns(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.columns
            .retain(|_| flags.next().copied().unwrap_or(false));
        if self.columns.is_empty() {
            self.height = 0;
        }
    }

    /// Names that occur more than once, in order of first appearance.
    ///
    /// Names are compared ignoring ASCII case, as the store does, so
    /// `County` and `county` are both reported.
    pub fn duplicate_column_names(&self) -> Vec<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for column in &self.columns {
            *counts.entry(column.name.to_ascii_lowercase()).or_insert(0) += 1;
        }
        let mut reported = BTreeSet::new();
        self.columns
            .iter()
            .filter(|column| counts.get(&column.name.to_ascii_lowercase()).is_some_and(|n| *n > 1))
            .filter(|column| reported.insert(column.name.as_str()))
            .map(|column| column.name.clone())
            .collect()
    }
}
