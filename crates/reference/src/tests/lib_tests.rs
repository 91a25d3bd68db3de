use super::*;

fn row(state: &str, county: &str) -> ReferenceRow {
    ReferenceRow {
        state: state.into(),
        county: county.into(),
    }
}

fn write_reference_csv(contents: &str) -> std::path::PathBuf {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("reference_table_test_{suffix}.csv"));
    std::fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn drops_rows_outside_the_valid_state_set() {
    let table = ReferenceTable::from_rows([
        row("NY", "Albany"),
        row("ON", "Essex"),
        row("XX", "Nowhere"),
        row("PR", "San Juan"),
    ]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.states(), vec!["NY", "PR"]);
}

#[test]
fn states_are_sorted_and_unique() {
    let table = ReferenceTable::from_rows([
        row("WY", "Teton"),
        row("AL", "Autauga"),
        row("WY", "Albany"),
        row("AL", "Baldwin"),
    ]);
    assert_eq!(table.states(), vec!["AL", "WY"]);
}

#[test]
fn counties_are_scoped_to_the_requested_state() {
    let table = ReferenceTable::from_rows([
        row("NY", "Albany"),
        row("WY", "Albany"),
        row("NY", "Bronx"),
        row("NY", "Albany"),
    ]);
    assert_eq!(table.counties_in("NY"), vec!["Albany", "Bronx"]);
    assert_eq!(table.counties_in("WY"), vec!["Albany"]);
    assert!(table.counties_in("VT").is_empty());
}

#[test]
fn every_filtered_row_yields_a_selectable_county() {
    let table = ReferenceTable::from_rows([
        row("NY", "Albany"),
        row("ON", "Essex"),
        row("CA", "Kern"),
    ]);
    for state in table.states() {
        assert!(
            !table.counties_in(&state).is_empty(),
            "state {state} has no counties"
        );
    }
}

#[test]
fn loads_and_filters_csv_file() {
    let path = write_reference_csv(
        "FAC_STATE,County\nNY,Albany\nON,Essex\nNY,Bronx\nCA,Kern\n,Orphan\nNY,\n",
    );
    let table = ReferenceTable::load(&path).expect("load");
    assert_eq!(table.states(), vec!["CA", "NY"]);
    assert_eq!(table.counties_in("NY"), vec!["Albany", "Bronx"]);
    std::fs::remove_file(path).expect("cleanup");
}

#[test]
fn loading_twice_yields_identical_tables() {
    let path = write_reference_csv("FAC_STATE,County\nNY,Albany\nCA,Kern\n");
    let first = ReferenceTable::load(&path).expect("first load");
    let second = ReferenceTable::load(&path).expect("second load");
    assert_eq!(first, second);
    std::fs::remove_file(path).expect("cleanup");
}

#[test]
fn missing_column_is_an_error() {
    let path = write_reference_csv("STATE,County\nNY,Albany\n");
    let err = ReferenceTable::load(&path).expect_err("should fail");
    assert!(err.to_string().contains("FAC_STATE"));
    std::fs::remove_file(path).expect("cleanup");
}

#[test]
fn fips_registry_covers_every_valid_abbreviation() {
    for abbr in STATE_ABBREVIATIONS {
        assert!(state_fips(abbr).is_some(), "no FIPS code for {abbr}");
    }
    assert_eq!(state_fips("NY"), Some("36"));
    assert_eq!(state_fips("ON"), None);
}
