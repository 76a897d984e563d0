//! Raw-to-normalized column name mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from a raw source column identifier to its normalized name.
///
/// Keys are unique; inserting an existing raw name replaces its target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: BTreeMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, raw: impl Into<String>, target: impl Into<String>) -> Option<String> {
        self.entries.insert(raw.into(), target.into())
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(raw, target)| (raw.as_str(), target.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (raw, target) in iter {
            mapping.insert(raw, target);
        }
        mapping
    }
}
