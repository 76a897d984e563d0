//! Per-dataset projection queries.
//!
//! Every transform reads one stored table and exposes its county key as
//! `FIPS`. Census tables take the key from the last five characters of
//! `Geography` and split `Geographic_Area_Name` ("Alameda County,
//! California") into `COUNTY` and `STATE`.

use std::fmt;
use std::time::Instant;

use tracing::info;

use pol_model::{Dataset, Result};
use pol_store::Store;

use crate::clean::replace_values;

/// The seven datasets joined into the final table, in join order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    Election,
    Fips,
    Education,
    DemHousing,
    AgeSex,
    Income,
    Occupation,
}

impl DatasetKind {
    /// Left-join order; the election table is the base.
    pub const JOIN_ORDER: [Self; 7] = [
        Self::Election,
        Self::Fips,
        Self::Education,
        Self::DemHousing,
        Self::AgeSex,
        Self::Income,
        Self::Occupation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Election => "election",
            Self::Fips => "fips",
            Self::Education => "education",
            Self::DemHousing => "dem_housing",
            Self::AgeSex => "age_sex",
            Self::Income => "income",
            Self::Occupation => "occupation",
        }
    }

    pub fn source_table(self) -> &'static str {
        match self {
            Self::Election => "elections",
            Self::Fips => "fips",
            Self::Education => "edu_att_test",
            Self::DemHousing => "demographic_and_housing",
            Self::AgeSex => "AgeSexData",
            Self::Income => "income",
            Self::Occupation => "occ",
        }
    }

    /// Output columns after the key, as selected from the source table.
    fn projection(self) -> Vec<String> {
        match self {
            Self::Election => vec![
                r#""Code""#.to_string(),
                r#""County""#.to_string(),
                r#""Population""#.to_string(),
                r#""2020W" AS "2020_winner""#.to_string(),
                r#""2020D" AS "DEM_per""#.to_string(),
                r#""2020R" AS "REP_per""#.to_string(),
                r#""2020O" AS "OTH_per""#.to_string(),
                r#""2016W" AS "2016_winner""#.to_string(),
            ],
            Self::Fips => quoted(&["county", "state_abbr", "state"]),
            Self::Education => vec![
                r#"("Pop_25_HS" * 100.0) / "Pop_25_EDUATT" AS "per_hs""#.to_string(),
                r#"(("Pop_25_SC" + "Pop_25_AD" + "Pop_25_COLL") * 100.0) / "Pop_25_EDUATT" AS "per_coll""#
                    .to_string(),
                r#"("Pop_25_GRAD" * 100.0) / "Pop_25_EDUATT" AS "per_grad""#.to_string(),
            ],
            Self::DemHousing => with_area(quoted(&[
                "EST_RACE_T_POP_One_race_White",
                "EST_RACE_T_POP_One_race_AA",
                "EST_RACE_T_POP_One_race_AI",
                "EST_RACE_T_POP_One_race_Asian",
                "Percent_T_housing_units",
                "Percent_CITIZEN,_VOTE,_18_and_over_POP",
                "Percent_CITIZEN,_VOTE,_18_and_over_POP_Male",
                "Percent_CITIZEN,_VOTE,_18_and_over_POP_Female",
            ])),
            Self::AgeSex => {
                let mut columns: Vec<String> = (20..=80)
                    .step_by(5)
                    .map(|start| format!("EST_Percent_T_POP_AGE_{start}_to_{}_years", start + 4))
                    .collect();
                columns.push("EST_Percent_T_POP_AGE_85_YO".to_string());
                columns.push("EST_Percent_Female_T_POP_SUM_Sex_ratio_(MP100F)".to_string());
                let names: Vec<&str> = columns.iter().map(String::as_str).collect();
                with_area(quoted(&names))
            }
            Self::Income => quoted(&[
                "EST_HH_Median_income_(dollars)",
                "MOE_HH_Median_income_(dollars)",
                "EST_HH_Mean_income_(dollars)",
                "MOE_HH_Mean_income_(dollars)",
            ]),
            Self::Occupation => quoted(&["EST_T_CE_POP_16_YO", "EST_T_PERCENT_ALLOCATED_Occupation"]),
        }
    }

    fn key_expression(self) -> &'static str {
        match self {
            Self::Election => r#""FIPS""#,
            Self::Fips | Self::Education => r#""fips""#,
            Self::DemHousing | Self::AgeSex | Self::Income | Self::Occupation => {
                r#"substr("Geography", -5)"#
            }
        }
    }

    /// The projection query run against [`Self::source_table`].
    pub fn query(self) -> String {
        let mut select = vec![format!(r#"{} AS "FIPS""#, self.key_expression())];
        select.extend(self.projection());
        format!(
            "SELECT {} FROM \"{}\"",
            select.join(", "),
            self.source_table()
        )
    }

    /// Run the projection and any value remapping for this dataset.
    pub fn run(self, store: &Store) -> Result<Dataset> {
        let started = Instant::now();
        let mut dataset = store.query(&self.query())?;
        if self == Self::Election {
            replace_values(&mut dataset, "2016_winner", &[("Trump", "REP"), ("Clinton", "DEM")]);
        }
        info!(
            dataset = self.name(),
            source = self.source_table(),
            rows = dataset.height(),
            columns = dataset.width(),
            duration_ms = started.elapsed().as_millis(),
            "transformed dataset"
        );
        Ok(dataset)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn quoted(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| format!("\"{name}\"")).collect()
}

fn with_area(mut columns: Vec<String>) -> Vec<String> {
    let county = r#"CASE WHEN instr("Geographic_Area_Name", ',') > 0
        THEN substr("Geographic_Area_Name", 1, instr("Geographic_Area_Name", ',') - 1)
        ELSE "Geographic_Area_Name" END AS "COUNTY""#;
    let state = r#"CASE WHEN instr("Geographic_Area_Name", ',') > 0
        THEN trim(substr("Geographic_Area_Name", instr("Geographic_Area_Name", ',') + 1))
        ELSE "Geographic_Area_Name" END AS "STATE""#;
    columns.insert(0, state.to_string());
    columns.insert(0, county.to_string());
    columns
}
