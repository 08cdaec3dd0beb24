use chrono::NaiveDate;
use serde::Deserialize;

/// Comparison request body.
///
/// `aoi` is optional: when a file-derived AOI is active the field is ignored
/// even if present.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub aoi: Option<AoiBody>,
    pub start1: NaiveDate,
    pub end1: NaiveDate,
    pub start2: NaiveDate,
    pub end2: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct AoiBody {
    pub geometry: GeometryBody,
}

/// Polygon rings as drawn on the frontend map: exterior ring first, each a
/// list of `[lng, lat]` positions.
#[derive(Debug, Deserialize)]
pub struct GeometryBody {
    pub coordinates: Vec<Vec<[f64; 2]>>,
}
