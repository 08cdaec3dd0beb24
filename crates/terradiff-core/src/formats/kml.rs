//! KML AOI extraction.
//!
//! Walks the document tree (folders may nest arbitrarily) and collects every
//! placemark polygon. KML is always WGS84, so coordinates pass through
//! unchanged.

use std::fs;
use std::path::Path;

use geo_types::{LineString, Polygon};
use kml::Kml;

use crate::error::{Result, TerradiffError};
use crate::models::Aoi;

pub fn read_aoi(path: &Path) -> Result<Aoi> {
    let content = fs::read_to_string(path)?;
    parse_aoi(&content)
}

/// Parse KML text into an AOI. Split out so the KMZ reader can reuse it on
/// archive members.
pub(crate) fn parse_aoi(content: &str) -> Result<Aoi> {
    let parsed: Kml = content.parse().map_err(|e| TerradiffError::FileExtraction {
        format: "KML".to_string(),
        reason: format!("failed to parse: {e}"),
    })?;

    let mut polygons = Vec::new();
    collect_polygons(&parsed, &mut polygons);

    if polygons.is_empty() {
        return Err(TerradiffError::FileExtraction {
            format: "KML".to_string(),
            reason: "no polygon placemark found".to_string(),
        });
    }
    Aoi::from_polygons(polygons)
}

fn collect_polygons(kml: &Kml, out: &mut Vec<Polygon<f64>>) {
    match kml {
        Kml::KmlDocument(doc) => {
            for element in &doc.elements {
                collect_polygons(element, out);
            }
        }
        Kml::Document { elements, .. } | Kml::Folder { elements, .. } => {
            for element in elements {
                collect_polygons(element, out);
            }
        }
        Kml::Placemark(placemark) => {
            if let Some(geometry) = &placemark.geometry {
                collect_from_geometry(geometry, out);
            }
        }
        // Points, lines, overlays and the rest cannot define an AOI.
        _ => {}
    }
}

fn collect_from_geometry(geometry: &kml::types::Geometry, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        kml::types::Geometry::Polygon(polygon) => out.push(convert_polygon(polygon)),
        kml::types::Geometry::MultiGeometry(multi) => {
            for inner in &multi.geometries {
                collect_from_geometry(inner, out);
            }
        }
        _ => {}
    }
}

fn convert_polygon(polygon: &kml::types::Polygon) -> Polygon<f64> {
    let ring = |coords: &[kml::types::Coord]| {
        LineString::from(coords.iter().map(|c| (c.x, c.y)).collect::<Vec<_>>())
    };
    Polygon::new(
        ring(&polygon.outer.coords),
        polygon.inner.iter().map(|r| ring(&r.coords)).collect(),
    )
}
