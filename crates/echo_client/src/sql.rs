//! Query builders for the warehouse endpoints. The services accept literal
//! SQL strings; everything interpolated here is escaped by doubling single
//! quotes.

use shared::domain::BlockGroupRange;

use crate::SpatialTables;

pub const FACILITY_TABLE: &str = "ECHO_EXPORTER";
pub const SCREENING_TABLE: &str = "EJSCREEN_2021_USPR";

fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// Active facilities of one county. County matching is case-insensitive on
/// the warehouse side, which stores upper-cased county names.
pub fn active_facilities_sql(state: &str, county: &str) -> String {
    format!(
        "SELECT * FROM \"{FACILITY_TABLE}\" WHERE \"FAC_STATE\" = '{}' AND \"FAC_ACTIVE_FLAG\" = 'Y' AND UPPER(\"FAC_COUNTY\") = '{}'",
        escape(state),
        escape(&county.to_uppercase()),
    )
}

/// County boundary rows, matched on state FIPS plus the title-cased county
/// name the census tables carry.
pub fn county_boundary_sql(tables: &SpatialTables, state_fips: &str, county: &str) -> String {
    format!(
        "SELECT * FROM \"{}\" WHERE \"statefp\" = '{}' AND \"name\" = '{}'",
        tables.county_table,
        escape(state_fips),
        escape(&title_case(county)),
    )
}

pub fn state_boundary_sql(tables: &SpatialTables, state: &str) -> String {
    format!(
        "SELECT * FROM \"{}\" WHERE \"stusps\" = '{}'",
        tables.state_table,
        escape(state),
    )
}

/// The literal inclusive BETWEEN the screening warehouse expects. The caller
/// re-filters rows to the half-open range, so the inclusive upper end never
/// leaks a neighboring county's first block group into a view.
pub fn screening_sql(range: BlockGroupRange) -> String {
    format!(
        "SELECT * from \"{SCREENING_TABLE}\" where \"ID\" between {} and {}",
        range.baseline, range.next,
    )
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest:
/// "st. lawrence" -> "St. Lawrence", "DE KALB" -> "De Kalb".
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/sql_tests.rs"]
mod tests;
