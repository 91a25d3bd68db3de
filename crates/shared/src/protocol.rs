use serde::{Deserialize, Serialize};

use crate::domain::{FacilityRecord, ScreeningTable};

/// The one warning the page shows for every failed retrieval, whatever the
/// underlying cause.
pub const INVALID_SELECTION_WARNING: &str = "Not a valid state and/or county";

/// Column-ordered table payload as the page renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The complete derived view for one `(state, county)` selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountySnapshot {
    pub state: String,
    pub county: String,
    pub facilities: TablePayload,
    pub screening: TablePayload,
    pub map: MapDocument,
}

/// Outcome of a view request. `Invalid` carries the one generic warning the
/// page shows in place of all data output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CountyViewResponse {
    Ready { snapshot: Box<CountySnapshot> },
    Invalid { warning: String },
}

/// Leaflet path options for a boundary overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryStyle {
    pub fill_color: String,
    pub color: String,
    pub weight: u32,
    pub fill_opacity: f64,
}

/// Leaflet circle-marker options for a facility marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: u32,
    pub color: String,
    pub weight: u32,
    pub fill_color: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapBoundary {
    pub geometry: serde_json::Value,
    pub style: BoundaryStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub popup: String,
    pub style: MarkerStyle,
}

/// South-west / north-east viewport corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Everything the page needs to draw the map: one boundary overlay, the
/// clustered facility markers, and the viewport to fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDocument {
    pub boundary: MapBoundary,
    pub markers: Vec<MapMarker>,
    pub cluster: bool,
    pub bounds: Option<MapBounds>,
    pub padding: u32,
}

/// The facility columns the dashboard table displays. The full record keeps
/// more attributes for the marker popup.
pub const FACILITY_TABLE_COLUMNS: [&str; 3] = ["FAC_NAME", "FAC_COUNTY", "FAC_STATE"];

pub fn facility_table(facilities: &[FacilityRecord]) -> TablePayload {
    TablePayload {
        columns: FACILITY_TABLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: facilities
            .iter()
            .map(|f| vec![f.name.clone(), f.county.clone(), f.state.clone()])
            .collect(),
    }
}

pub fn screening_table(screening: &ScreeningTable) -> TablePayload {
    TablePayload {
        columns: screening.columns.clone(),
        rows: screening
            .rows
            .iter()
            .map(|row| {
                screening
                    .columns
                    .iter()
                    .map(|col| row.values.get(col).cloned().unwrap_or_default())
                    .collect()
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
