//! Map composition: one county boundary overlay, clustered facility
//! markers, and the viewport that fits them. Pure data in, pure data out;
//! the page script feeds the resulting document straight into Leaflet.

use shared::domain::{CountyBoundary, FacilityRecord};
use shared::protocol::{
    BoundaryStyle, MapBoundary, MapBounds, MapDocument, MapMarker, MarkerStyle,
};

/// Boundary styling for a region that is displayed but not highlighted.
pub fn other_region_style() -> BoundaryStyle {
    BoundaryStyle {
        fill_color: "#FFA500".into(),
        color: "#182799".into(),
        weight: 1,
        fill_opacity: 0.4,
    }
}

/// The fixed facility marker: orange filled circle, thin black outline.
pub fn facility_marker_style() -> MarkerStyle {
    MarkerStyle {
        radius: 8,
        color: "black".into(),
        weight: 1,
        fill_color: "orange".into(),
        fill_opacity: 0.4,
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Popup body for one facility marker: the name, an address line when the
/// export carries one, and a link to the EPA detailed facility report.
pub fn marker_text(facility: &FacilityRecord) -> String {
    let mut text = format!("<b>{}</b>", escape_html(&facility.name));
    match (&facility.street, &facility.city) {
        (Some(street), Some(city)) => {
            text.push_str(&format!(
                "<p>{}, {}</p>",
                escape_html(street),
                escape_html(city)
            ));
        }
        (Some(line), None) | (None, Some(line)) => {
            text.push_str(&format!("<p>{}</p>", escape_html(line)));
        }
        (None, None) => {}
    }
    if let Some(registry_id) = &facility.registry_id {
        text.push_str(&format!(
            "<p><a href=\"https://echo.epa.gov/detailed-facility-report?fid={}\" target=\"_blank\">EPA ECHO detailed facility report</a></p>",
            escape_html(registry_id)
        ));
    }
    text
}

#[derive(Debug, Clone, Copy, Default)]
struct BoundsAccumulator {
    bounds: Option<MapBounds>,
}

impl BoundsAccumulator {
    fn extend(&mut self, lat: f64, lng: f64) {
        if !lat.is_finite() || !lng.is_finite() {
            return;
        }
        self.bounds = Some(match self.bounds {
            None => MapBounds {
                south: lat,
                west: lng,
                north: lat,
                east: lng,
            },
            Some(b) => MapBounds {
                south: b.south.min(lat),
                west: b.west.min(lng),
                north: b.north.max(lat),
                east: b.east.max(lng),
            },
        });
    }

    /// Walk nested GeoJSON coordinate arrays down to `[lng, lat]` leaves.
    fn extend_coordinates(&mut self, value: &serde_json::Value) {
        let Some(array) = value.as_array() else {
            return;
        };
        if array.len() >= 2 && array[0].is_number() && array[1].is_number() {
            if let (Some(lng), Some(lat)) = (array[0].as_f64(), array[1].as_f64()) {
                self.extend(lat, lng);
            }
            return;
        }
        for item in array {
            self.extend_coordinates(item);
        }
    }

    fn extend_geometry(&mut self, geometry: &serde_json::Value) {
        if let Some(coordinates) = geometry.get("coordinates") {
            self.extend_coordinates(coordinates);
        }
        // GeometryCollection nests geometries instead of coordinates.
        if let Some(geometries) = geometry.get("geometries").and_then(|g| g.as_array()) {
            for inner in geometries {
                self.extend_geometry(inner);
            }
        }
    }
}

/// Compose the renderable map for one county: boundary overlay, one
/// clustered marker per facility with coordinates, and the bounding
/// viewport over everything drawn, fit with zero padding.
pub fn compose(facilities: &[FacilityRecord], boundary: &CountyBoundary) -> MapDocument {
    let mut accumulator = BoundsAccumulator::default();
    accumulator.extend_geometry(&boundary.geometry);

    let marker_style = facility_marker_style();
    let mut markers = Vec::new();
    for facility in facilities {
        let (Some(lat), Some(lng)) = (facility.lat, facility.long) else {
            continue;
        };
        accumulator.extend(lat, lng);
        markers.push(MapMarker {
            lat,
            lng,
            popup: marker_text(facility),
            style: marker_style.clone(),
        });
    }

    MapDocument {
        boundary: MapBoundary {
            geometry: boundary.geometry.clone(),
            style: other_region_style(),
        },
        markers,
        cluster: true,
        bounds: accumulator.bounds,
        padding: 0,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
