//! Response decoding for the warehouse endpoints: CSV for the data service,
//! GeoJSON for the spatial service.

use std::collections::BTreeMap;

use shared::domain::{CountyBoundary, FacilityRecord, Geoid, ScreeningRow, ScreeningTable};
use shared::error::RetrievalError;

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn headers(reader: &mut csv::Reader<&[u8]>) -> Result<Vec<String>, RetrievalError> {
    Ok(reader
        .headers()
        .map_err(|e| RetrievalError::malformed(format!("unreadable CSV header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect())
}

fn require_column(columns: &[String], name: &str) -> Result<usize, RetrievalError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| RetrievalError::malformed(format!("response is missing column '{name}'")))
}

fn cell(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or_default().trim().to_string()
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Decode the facility export CSV. `FAC_NAME`, `FAC_COUNTY` and `FAC_STATE`
/// must be present; coordinates and the rest of the row are best-effort.
pub fn facilities_from_csv(text: &str) -> Result<Vec<FacilityRecord>, RetrievalError> {
    let mut reader = csv_reader(text);
    let columns = headers(&mut reader)?;
    let name_idx = require_column(&columns, "FAC_NAME")?;
    let county_idx = require_column(&columns, "FAC_COUNTY")?;
    let state_idx = require_column(&columns, "FAC_STATE")?;
    let lat_idx = columns.iter().position(|c| c == "FAC_LAT");
    let long_idx = columns.iter().position(|c| c == "FAC_LONG");
    let registry_idx = columns.iter().position(|c| c == "REGISTRY_ID");
    let street_idx = columns.iter().position(|c| c == "FAC_STREET");
    let city_idx = columns.iter().position(|c| c == "FAC_CITY");

    let named = [
        Some(name_idx),
        Some(county_idx),
        Some(state_idx),
        lat_idx,
        long_idx,
        registry_idx,
        street_idx,
        city_idx,
    ];

    let mut facilities = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| RetrievalError::malformed(format!("unreadable CSV row: {e}")))?;
        let mut extra = BTreeMap::new();
        for (idx, column) in columns.iter().enumerate() {
            if named.contains(&Some(idx)) {
                continue;
            }
            let value = cell(&record, idx);
            if !value.is_empty() {
                extra.insert(column.clone(), value);
            }
        }
        facilities.push(FacilityRecord {
            name: cell(&record, name_idx),
            county: cell(&record, county_idx),
            state: cell(&record, state_idx),
            lat: lat_idx.and_then(|i| cell(&record, i).parse().ok()),
            long: long_idx.and_then(|i| cell(&record, i).parse().ok()),
            registry_id: registry_idx.and_then(|i| optional(cell(&record, i))),
            street: street_idx.and_then(|i| optional(cell(&record, i))),
            city: city_idx.and_then(|i| optional(cell(&record, i))),
            extra,
        });
    }
    Ok(facilities)
}

/// Decode a screening CSV keyed by the 12-digit block group `ID`. A row
/// whose id does not parse is a malformed response, not a skippable cell:
/// range scoping depends on it.
pub fn screening_from_csv(text: &str) -> Result<ScreeningTable, RetrievalError> {
    let mut reader = csv_reader(text);
    let columns = headers(&mut reader)?;
    let id_idx = require_column(&columns, "ID")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| RetrievalError::malformed(format!("unreadable CSV row: {e}")))?;
        let raw_id = cell(&record, id_idx);
        let id: u64 = raw_id
            .parse()
            .map_err(|_| RetrievalError::malformed(format!("bad block group id '{raw_id}'")))?;
        let mut values = BTreeMap::new();
        for (idx, column) in columns.iter().enumerate() {
            values.insert(column.clone(), cell(&record, idx));
        }
        rows.push(ScreeningRow { id, values });
    }
    Ok(ScreeningTable { columns, rows })
}

fn feature_property<'a>(
    properties: &'a serde_json::Value,
    keys: &[&str],
) -> Option<&'a serde_json::Value> {
    keys.iter().find_map(|key| properties.get(*key))
}

fn property_string(properties: &serde_json::Value, keys: &[&str]) -> Option<String> {
    match feature_property(properties, keys)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode county features from a spatial FeatureCollection. Features without
/// a geoid or geometry are skipped; the county tables carry the id under
/// `geoid` or `GEOID` depending on vintage.
pub fn county_boundaries_from_geojson(text: &str) -> Result<Vec<CountyBoundary>, RetrievalError> {
    let geojson: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| RetrievalError::malformed(format!("spatial response is not JSON: {e}")))?;
    let features = geojson
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| RetrievalError::malformed("spatial response has no features array"))?;

    let mut boundaries = Vec::new();
    for feature in features {
        let Some(properties) = feature.get("properties") else {
            continue;
        };
        let Some(geometry) = feature.get("geometry") else {
            continue;
        };
        let Some(geoid) = property_string(properties, &["geoid", "GEOID"]) else {
            continue;
        };
        let name = property_string(properties, &["name", "NAME", "namelsad", "NAMELSAD"])
            .unwrap_or_default();
        boundaries.push(CountyBoundary {
            geoid: Geoid(geoid),
            name,
            geometry: geometry.clone(),
        });
    }
    Ok(boundaries)
}

/// First feature geometry of a spatial FeatureCollection, if any. Used for
/// the state outline, which the dashboard fetches but only keeps whole.
pub fn first_geometry_from_geojson(
    text: &str,
) -> Result<Option<serde_json::Value>, RetrievalError> {
    let geojson: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| RetrievalError::malformed(format!("spatial response is not JSON: {e}")))?;
    let features = geojson
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| RetrievalError::malformed("spatial response has no features array"))?;
    Ok(features
        .iter()
        .find_map(|feature| feature.get("geometry"))
        .cloned())
}

#[cfg(test)]
#[path = "tests/parse_tests.rs"]
mod tests;
