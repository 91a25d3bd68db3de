use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Block groups per county in the 12-digit census numbering: a county geoid
/// is 5 digits, block group ids append 7 more.
pub const BLOCK_GROUPS_PER_COUNTY: u64 = 10_000_000;

/// 5-digit county FIPS identifier. Kept as a string because leading zeros
/// are significant ("01001" is Autauga County, AL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geoid(pub String);

impl Geoid {
    /// The numeric id range of this county's census block groups, or `None`
    /// when the geoid is not a 5-digit number.
    pub fn block_group_range(&self) -> Option<BlockGroupRange> {
        if self.0.len() != 5 || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let county: u64 = self.0.parse().ok()?;
        let baseline = county * BLOCK_GROUPS_PER_COUNTY;
        Some(BlockGroupRange {
            baseline,
            next: baseline + BLOCK_GROUPS_PER_COUNTY,
        })
    }
}

impl std::fmt::Display for Geoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Half-open range `[baseline, next)` of 12-digit block group ids belonging
/// to a single county.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockGroupRange {
    pub baseline: u64,
    pub next: u64,
}

impl BlockGroupRange {
    pub fn contains(&self, id: u64) -> bool {
        id >= self.baseline && id < self.next
    }
}

/// One active regulated facility as reported by the compliance warehouse.
/// The named fields are the ones the dashboard consumes; everything else
/// from the export row is carried in `extra` for popup rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub county: String,
    pub state: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub registry_id: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// A county outline with the geoid that keys its block groups. The geometry
/// is the GeoJSON geometry object exactly as the spatial service returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyBoundary {
    pub geoid: Geoid,
    pub name: String,
    pub geometry: serde_json::Value,
}

/// Environmental-justice screening rows, one per census block group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningTable {
    pub columns: Vec<String>,
    pub rows: Vec<ScreeningRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRow {
    pub id: u64,
    pub values: BTreeMap<String, String>,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
