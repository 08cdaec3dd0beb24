use serde::Serialize;
use serde_json::{Map, Value};
use terradiff_core::models::{Comparison, VisParams};
use terradiff_core::IndexKind;

/// Body returned by the four comparison routes.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub message: String,
    pub tile_url1: String,
    pub tile_url2: String,
    /// Keyed `<IDX>_mean` / `<IDX>_stdDev`, matching the compute service's
    /// reducer output names.
    pub stats1: Map<String, Value>,
    pub stats2: Map<String, Value>,
    #[serde(rename = "timeSeriesDates")]
    pub time_series_dates: Vec<String>,
    #[serde(rename = "timeSeriesValues")]
    pub time_series_values: Vec<f64>,
    pub vis_params: VisParams,
    pub aoi_bounds: geojson::Geometry,
}

impl CompareResponse {
    pub fn from_comparison(index: IndexKind, comparison: Comparison) -> Self {
        let band = index.band();
        Self {
            message: format!("{band} comparison completed"),
            tile_url1: comparison.tile_url1,
            tile_url2: comparison.tile_url2,
            stats1: comparison.stats1.to_named_map(band),
            stats2: comparison.stats2.to_named_map(band),
            time_series_dates: comparison.series.dates.iter().map(|d| d.to_string()).collect(),
            time_series_values: comparison.series.values,
            vis_params: comparison.vis,
            aoi_bounds: comparison.bounds,
        }
    }
}

/// Upload response carrying the extracted geometry back to the frontend.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub aoi: geojson::Geometry,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "terradiff-api" }
    }
}
