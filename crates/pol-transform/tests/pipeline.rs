use std::fs;
use std::path::{Path, PathBuf};

use pol_model::{PipelineError, Value};
use pol_store::Store;
use pol_transform::{ElectionSource, PipelineConfig, collect, join};

fn csv_line(cells: &[&str]) -> String {
    let quoted: Vec<String> = cells
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect();
    quoted.join(",")
}

fn write_csv(dir: &Path, name: &str, rows: &[Vec<&str>]) {
    let body: Vec<String> = rows.iter().map(|row| csv_line(row)).collect();
    fs::write(dir.join(name), body.join("\n") + "\n").expect("write fixture");
}

/// Write `<name>.csv` (raw ids, label row, data) and its mapping file.
/// `columns` pairs a raw id with the normalized label it maps to.
fn write_census(dir: &Path, name: &str, columns: &[(&str, &str)], rows: &[Vec<&str>]) {
    let mut data = vec![columns.iter().map(|(raw, _)| *raw).collect::<Vec<_>>()];
    data.push(columns.iter().map(|(_, label)| *label).collect());
    data.extend(rows.iter().cloned());
    write_csv(dir, &format!("{name}.csv"), &data);

    let mut mapping = vec![vec!["Column Name", "Label"]];
    mapping.extend(columns.iter().map(|(raw, label)| vec![*raw, *label]));
    write_csv(dir, &format!("{name}_columnMappings.csv"), &mapping);
}

fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path();

    write_csv(
        path,
        "elections.csv",
        &[
            vec!["FIPS", "Code", "County", "Population", "2020W", "2020D", "2020R", "2020O", "2016W"],
            vec!["06001", "CA", "Alameda", "1671329", "Biden", "80.2", "17.6", "2.2", "Clinton"],
            vec!["48001", "TX", "Anderson", "57735", "Trump", "21.4", "78.0", "0.6", "Trump"],
        ],
    );
    write_csv(
        path,
        "FIPS.csv",
        &[
            vec!["fips", "county", "state_abbr", "state"],
            vec!["6001", "Alameda", "CA", "California"],
            vec!["48001", "Anderson", "TX", "Texas"],
        ],
    );
    write_csv(
        path,
        "edu_att_test.csv",
        &[
            vec!["fips", "Pop_25_EDUATT", "Pop_25_HS", "Pop_25_SC", "Pop_25_AD", "Pop_25_COLL", "Pop_25_GRAD"],
            vec!["6001", "1000", "200", "100", "50", "300", "250"],
            vec!["48001", "0", "0", "0", "0", "0", "0"],
        ],
    );

    let geo = [("GEO_ID", "Geography"), ("NAME", "Geographic Area Name")];
    let mut dem: Vec<(&str, &str)> = geo.to_vec();
    dem.extend([
        ("DP05_0037E", "EST_RACE_T_POP_One_race_White"),
        ("DP05_0038E", "EST_RACE_T_POP_One_race_AA"),
        ("DP05_0039E", "EST_RACE_T_POP_One_race_AI"),
        ("DP05_0044E", "EST_RACE_T_POP_One_race_Asian"),
        ("DP05_0086PE", "Percent_T_housing_units"),
        ("DP05_0087PE", "Percent_CITIZEN,_VOTE,_18_and_over_POP"),
        ("DP05_0088PE", "Percent_CITIZEN,_VOTE,_18_and_over_POP_Male"),
        ("DP05_0089PE", "Percent_CITIZEN,_VOTE,_18_and_over_POP_Female"),
        ("DP05_0090PE", "Percent_CITIZEN,_VOTE,_18_and_over_POP_Female"),
    ]);
    write_census(
        path,
        "demographic_and_housing",
        &dem,
        &[vec![
            "0500000US48001",
            "Anderson County, Texas",
            "40000",
            "11000",
            "300",
            "400",
            "(X)",
            "74.1",
            "49.0",
            "51.0",
            "99.9",
        ]],
    );

    let mut age: Vec<(String, String)> = geo
        .iter()
        .map(|(raw, label)| ((*raw).to_string(), (*label).to_string()))
        .collect();
    for (idx, start) in (20..=80).step_by(5).enumerate() {
        age.push((
            format!("S0101_C02_{idx:03}E"),
            format!("EST_Percent_T_POP_AGE_{start}_to_{}_years", start + 4),
        ));
    }
    age.push(("S0101_C02_100E".to_string(), "EST_Percent_T_POP_AGE_85_YO".to_string()));
    age.push((
        "S0101_C05_100E".to_string(),
        "EST_Percent_Female_T_POP_SUM_Sex_ratio_(MP100F)".to_string(),
    ));
    let age_refs: Vec<(&str, &str)> = age.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    write_census(path, "AgeSexData", &age_refs, &[]);

    let mut income: Vec<(&str, &str)> = geo.to_vec();
    income.extend([
        ("S1901_C01_012E", "EST_HH_Median_income_(dollars)"),
        ("S1901_C01_012M", "MOE_HH_Median_income_(dollars)"),
        ("S1901_C01_013E", "EST_HH_Mean_income_(dollars)"),
        ("S1901_C01_013M", "MOE_HH_Mean_income_(dollars)"),
    ]);
    write_census(
        path,
        "income",
        &income,
        &[vec![
            "0500000US06001",
            "Alameda County, California",
            "112017",
            "1051",
            "153218",
            "N",
        ]],
    );

    let mut occ: Vec<(&str, &str)> = geo.to_vec();
    occ.extend([
        ("S2401_C01_001E", "EST_T_CE_POP_16_YO"),
        ("S2401_C01_036E", "EST_T_PERCENT_ALLOCATED_Occupation"),
    ]);
    write_census(
        path,
        "occ",
        &occ,
        &[
            vec!["0500000US06001", "Alameda County, California", "820000", "4.1"],
            vec!["0500000US06001", "Alameda County, California", "820001", "4.2"],
        ],
    );

    dir
}

fn config(data_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: data_dir.to_path_buf(),
        election: ElectionSource::File(PathBuf::from("elections.csv")),
        ..PipelineConfig::default()
    }
}

#[test]
fn collect_pushes_every_source() {
    let dir = fixture_dir();
    let mut store = Store::open_in_memory().expect("open store");
    let written = collect(&mut store, &config(dir.path())).expect("collect");

    let tables: Vec<&str> = written.iter().map(|summary| summary.table.as_str()).collect();
    assert_eq!(
        tables,
        vec![
            "elections",
            "fips",
            "edu_att_test",
            "AgeSexData",
            "demographic_and_housing",
            "occ",
            "income"
        ]
    );
    let dem = written
        .iter()
        .find(|summary| summary.table == "demographic_and_housing")
        .expect("dem summary");
    assert_eq!(dem.rows, 1);
    assert_eq!(dem.columns, 10);

    let geography = store
        .query("SELECT Geography, Percent_T_housing_units FROM demographic_and_housing")
        .expect("query dem");
    assert_eq!(geography.get(0, 0), Some(&Value::from("0500000US48001")));
    assert_eq!(geography.get(0, 1), Some(&Value::Null));
}

#[test]
fn join_builds_one_row_per_county() {
    let dir = fixture_dir();
    let export = dir.path().join("out").join("POL_FINAL.csv");
    let mut store = Store::open_in_memory().expect("open store");
    let config = PipelineConfig {
        export_path: Some(export.clone()),
        ..config(dir.path())
    };
    collect(&mut store, &config).expect("collect");
    let summary = join(&mut store, &config).expect("join");

    assert_eq!(summary.table, "POL_FINAL");
    assert_eq!(summary.rows, 2);

    let alameda = store
        .query(
            "SELECT FIPS, county_fips, state_abbr, \"2016_winner\", per_hs, per_coll, \
             EST_RACE_T_POP_One_race_White, \"EST_HH_Median_income_(dollars)\", \
             EST_T_CE_POP_16_YO \
             FROM POL_FINAL WHERE FIPS = 6001",
        )
        .expect("query final");
    assert_eq!(alameda.height(), 1);
    let row: Vec<&Value> = alameda.row(0).collect();
    assert_eq!(row[0], &Value::Int(6001));
    assert_eq!(row[1], &Value::from("Alameda"));
    assert_eq!(row[2], &Value::from("CA"));
    assert_eq!(row[3], &Value::from("DEM"));
    assert_eq!(row[4], &Value::Float(20.0));
    assert_eq!(row[5], &Value::Float(45.0));
    assert_eq!(row[6], &Value::Null);
    assert_eq!(row[7], &Value::Int(112_017));
    assert_eq!(row[8], &Value::Int(820_000));

    let anderson = store
        .query("SELECT \"2016_winner\", per_hs, COUNTY_dem_housing, STATE_dem_housing FROM POL_FINAL WHERE FIPS = 48001")
        .expect("query final");
    let row: Vec<&Value> = anderson.row(0).collect();
    assert_eq!(row[0], &Value::from("REP"));
    assert_eq!(row[1], &Value::Null);
    assert_eq!(row[2], &Value::from("Anderson County"));
    assert_eq!(row[3], &Value::from("Texas"));

    let exported = fs::read_to_string(&export).expect("read export");
    let mut lines = exported.lines();
    assert!(lines.next().expect("header").starts_with("FIPS,Code,County,"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn missing_source_file_fails_collect() {
    let dir = fixture_dir();
    fs::remove_file(dir.path().join("occ.csv")).expect("remove occ");
    let mut store = Store::open_in_memory().expect("open store");
    let err = collect(&mut store, &config(dir.path())).unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));
}
