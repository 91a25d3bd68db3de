use super::*;
use shared::domain::Geoid;

#[test]
fn builds_active_facility_query() {
    assert_eq!(
        active_facilities_sql("NY", "Albany"),
        "SELECT * FROM \"ECHO_EXPORTER\" WHERE \"FAC_STATE\" = 'NY' AND \"FAC_ACTIVE_FLAG\" = 'Y' AND UPPER(\"FAC_COUNTY\") = 'ALBANY'"
    );
}

#[test]
fn escapes_single_quotes_in_county_names() {
    let sql = active_facilities_sql("MD", "Prince George's");
    assert!(sql.contains("'PRINCE GEORGE''S'"));
}

#[test]
fn builds_county_boundary_query_with_fips_and_titlecase() {
    let sql = county_boundary_sql(&SpatialTables::default(), "36", "albany");
    assert_eq!(
        sql,
        "SELECT * FROM \"tl_2019_us_county\" WHERE \"statefp\" = '36' AND \"name\" = 'Albany'"
    );
}

#[test]
fn builds_state_boundary_query() {
    assert_eq!(
        state_boundary_sql(&SpatialTables::default(), "NY"),
        "SELECT * FROM \"tl_2019_us_state\" WHERE \"stusps\" = 'NY'"
    );
}

#[test]
fn screening_query_keeps_the_literal_between_shape() {
    let range = Geoid("36001".into()).block_group_range().expect("range");
    assert_eq!(
        screening_sql(range),
        "SELECT * from \"EJSCREEN_2021_USPR\" where \"ID\" between 360010000000 and 360020000000"
    );
}

#[test]
fn title_cases_multi_word_counties() {
    assert_eq!(title_case("st. lawrence"), "St. Lawrence");
    assert_eq!(title_case("DE KALB"), "De Kalb");
    assert_eq!(title_case("prince george's"), "Prince George'S");
    assert_eq!(title_case("anchorage"), "Anchorage");
}
