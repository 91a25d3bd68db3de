//! Static U.S. geography registries: the valid postal abbreviations and the
//! 2-digit state FIPS codes used by the spatial warehouse tables.

/// Postal abbreviations accepted by the reference-table filter: the fifty
/// states, DC, and the territories the warehouse reports on. The raw EPA
/// export also contains Canadian provinces and free-text garbage; anything
/// outside this set is dropped at load time.
pub const STATE_ABBREVIATIONS: [&str; 56] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY", "AS", "GU", "MP", "PR", "VI",
];

pub fn is_valid_state(abbr: &str) -> bool {
    STATE_ABBREVIATIONS.contains(&abbr)
}

/// 2-digit FIPS code for a state abbreviation, as used by the
/// `tl_2019_us_county.statefp` column.
pub fn state_fips(abbr: &str) -> Option<&'static str> {
    let code = match abbr {
        "AL" => "01",
        "AK" => "02",
        "AZ" => "04",
        "AR" => "05",
        "CA" => "06",
        "CO" => "08",
        "CT" => "09",
        "DE" => "10",
        "DC" => "11",
        "FL" => "12",
        "GA" => "13",
        "HI" => "15",
        "ID" => "16",
        "IL" => "17",
        "IN" => "18",
        "IA" => "19",
        "KS" => "20",
        "KY" => "21",
        "LA" => "22",
        "ME" => "23",
        "MD" => "24",
        "MA" => "25",
        "MI" => "26",
        "MN" => "27",
        "MS" => "28",
        "MO" => "29",
        "MT" => "30",
        "NE" => "31",
        "NV" => "32",
        "NH" => "33",
        "NJ" => "34",
        "NM" => "35",
        "NY" => "36",
        "NC" => "37",
        "ND" => "38",
        "OH" => "39",
        "OK" => "40",
        "OR" => "41",
        "PA" => "42",
        "RI" => "44",
        "SC" => "45",
        "SD" => "46",
        "TN" => "47",
        "TX" => "48",
        "UT" => "49",
        "VT" => "50",
        "VA" => "51",
        "WA" => "53",
        "WV" => "54",
        "WI" => "55",
        "WY" => "56",
        "AS" => "60",
        "GU" => "66",
        "MP" => "69",
        "PR" => "72",
        "VI" => "78",
        _ => return None,
    };
    Some(code)
}
