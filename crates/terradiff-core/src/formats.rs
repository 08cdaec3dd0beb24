//! AOI extraction from uploaded spatial files.
//!
//! Supported formats: GeoJSON (first feature's geometry), KML (placemark
//! polygons), KMZ (first `.kml` member of the archive). Each upload is parsed
//! from its own scratch path; nothing here touches shared directories.

pub mod geojson;
pub mod kml;
pub mod kmz;

use std::path::Path;

use crate::error::{Result, TerradiffError};
use crate::models::Aoi;

/// Dispatch on the file extension and extract a single AOI geometry.
pub fn extract_aoi(path: &Path) -> Result<Aoi> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "geojson" | "json" => geojson::read_aoi(path),
        "kml" => kml::read_aoi(path),
        "kmz" => kmz::read_aoi(path),
        other => Err(TerradiffError::FileExtraction {
            format: if other.is_empty() { "unknown".to_string() } else { other.to_uppercase() },
            reason: "unsupported file type, expected .geojson, .kml or .kmz".to_string(),
        }),
    }
}
