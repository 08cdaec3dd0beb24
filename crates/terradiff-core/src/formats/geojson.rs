//! GeoJSON AOI extraction.

use std::fs;
use std::path::Path;

use geojson::GeoJson;

use crate::error::{Result, TerradiffError};
use crate::models::Aoi;

/// Reads the first feature's geometry, matching what the frontend uploads:
/// a single-feature collection drawn or exported by the user.
pub fn read_aoi(path: &Path) -> Result<Aoi> {
    let content = fs::read_to_string(path)?;
    let parsed: GeoJson = content.parse().map_err(|e| TerradiffError::FileExtraction {
        format: "GeoJSON".to_string(),
        reason: format!("failed to parse: {e}"),
    })?;
    let geometry = first_geometry(&parsed)?;
    Aoi::from_geojson(&geometry)
}

fn first_geometry(parsed: &GeoJson) -> Result<geojson::Geometry> {
    let missing = |what: &str| TerradiffError::FileExtraction {
        format: "GeoJSON".to_string(),
        reason: format!("no geometry found: {what}"),
    };
    match parsed {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .first()
            .and_then(|f| f.geometry.clone())
            .ok_or_else(|| missing("empty feature collection")),
        GeoJson::Feature(feature) => {
            feature.geometry.clone().ok_or_else(|| missing("feature has no geometry"))
        }
        GeoJson::Geometry(geometry) => Ok(geometry.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[30.0, 50.0], [31.0, 50.0], [31.0, 51.0], [30.0, 51.0], [30.0, 50.0]]]
                },
                "properties": {"name": "field"}
            }
        ]
    }"#;

    #[test]
    fn reads_first_feature_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.geojson");
        fs::write(&path, SQUARE).unwrap();

        let aoi = read_aoi(&path).unwrap();
        match aoi.to_geojson().value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0][0], vec![30.0, 50.0]);
            }
            other => panic!("expected Polygon, got {other:?}"),
        }
    }

    #[test]
    fn bare_geometry_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.json");
        fs::write(
            &path,
            r#"{"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}"#,
        )
        .unwrap();
        assert!(read_aoi(&path).is_ok());
    }

    #[test]
    fn invalid_json_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.geojson");
        fs::write(&path, "not valid json").unwrap();

        let err = read_aoi(&path).unwrap_err();
        assert!(matches!(err, TerradiffError::FileExtraction { .. }));
    }

    #[test]
    fn empty_feature_collection_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.geojson");
        fs::write(&path, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();

        let err = read_aoi(&path).unwrap_err();
        assert!(matches!(err, TerradiffError::FileExtraction { .. }));
    }
}
