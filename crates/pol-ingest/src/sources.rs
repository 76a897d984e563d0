//! Fixed catalog of the files the collect stage loads.

use std::path::PathBuf;

/// Destination table for the downloaded election results.
pub const ELECTION_TABLE: &str = "elections";

/// A CSV file pushed to the store without cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainSource {
    pub file: &'static str,
    pub table: &'static str,
}

/// A census extract paired with its column mapping file.
///
/// Data lives in `<name>.csv`, the mapping in `<name>_columnMappings.csv`,
/// and the cleaned result is stored under `<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CensusSource {
    pub name: &'static str,
}

impl CensusSource {
    pub fn data_file(self) -> PathBuf {
        PathBuf::from(format!("{}.csv", self.name))
    }

    pub fn mapping_file(self) -> PathBuf {
        PathBuf::from(format!("{}_columnMappings.csv", self.name))
    }

    pub fn table(self) -> &'static str {
        self.name
    }
}

pub const PLAIN_SOURCES: &[PlainSource] = &[
    PlainSource {
        file: "FIPS.csv",
        table: "fips",
    },
    PlainSource {
        file: "edu_att_test.csv",
        table: "edu_att_test",
    },
];

pub const CENSUS_SOURCES: &[CensusSource] = &[
    CensusSource { name: "AgeSexData" },
    CensusSource {
        name: "demographic_and_housing",
    },
    CensusSource { name: "occ" },
    CensusSource { name: "income" },
];
