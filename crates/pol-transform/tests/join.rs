use pol_common::frame_to_dataset;
use pol_model::{Dataset, Value};
use pol_transform::{CountyInputs, join_counties};

fn table(headers: &[&str], rows: Vec<Vec<Value>>) -> Dataset {
    Dataset::from_rows(headers.iter().map(|name| name.to_string()).collect(), rows)
}

fn keys_only() -> Dataset {
    table(&["FIPS"], vec![])
}

fn inputs() -> CountyInputs {
    let election = table(
        &["FIPS", "County", "2016_winner"],
        vec![
            vec![Value::Int(48001), Value::from("Anderson"), Value::from("REP")],
            vec![Value::from("06001"), Value::from("Alameda"), Value::from("DEM")],
            vec![Value::Int(1001), Value::from("Autauga"), Value::from("REP")],
            vec![Value::Int(48001), Value::from("Anderson (repeat)"), Value::from("DEM")],
        ],
    );
    let fips = table(
        &["FIPS", "county", "state_abbr"],
        vec![
            vec![Value::Int(1001), Value::from("Autauga"), Value::from("AL")],
            vec![Value::Int(48001), Value::from("Anderson"), Value::from("TX")],
            vec![Value::Int(6001), Value::from("Alameda"), Value::from("CA")],
            vec![Value::Int(48001), Value::from("Anderson (second)"), Value::from("TX")],
        ],
    );
    let education = table(
        &["FIPS", "per_hs"],
        vec![vec![Value::Int(6001), Value::Float(20.0)]],
    );
    CountyInputs {
        election,
        fips,
        education,
        dem_housing: keys_only(),
        age_sex: keys_only(),
        income: keys_only(),
        occupation: keys_only(),
    }
}

fn values(dataset: &Dataset, column: &str) -> Vec<Value> {
    dataset.column(column).expect("column").values.clone()
}

#[test]
fn join_keeps_election_order_with_one_row_per_county() {
    let combined = join_counties(&inputs()).expect("join");
    let dataset = frame_to_dataset(&combined).expect("convert");

    assert_eq!(dataset.height(), 3);
    assert_eq!(
        values(&dataset, "FIPS"),
        vec![Value::Int(48001), Value::Int(6001), Value::Int(1001)]
    );
    assert_eq!(
        values(&dataset, "County"),
        vec![
            Value::from("Anderson"),
            Value::from("Alameda"),
            Value::from("Autauga")
        ]
    );
}

#[test]
fn join_keeps_first_right_match_and_suffixes_case_clashes() {
    let combined = join_counties(&inputs()).expect("join");
    let dataset = frame_to_dataset(&combined).expect("convert");

    assert_eq!(
        values(&dataset, "county_fips"),
        vec![
            Value::from("Anderson"),
            Value::from("Alameda"),
            Value::from("Autauga")
        ]
    );
    assert_eq!(
        values(&dataset, "state_abbr"),
        vec![Value::from("TX"), Value::from("CA"), Value::from("AL")]
    );
    assert_eq!(
        values(&dataset, "per_hs"),
        vec![Value::Null, Value::Float(20.0), Value::Null]
    );
}
