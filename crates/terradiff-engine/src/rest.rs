//! Earth Engine REST adapter.
//!
//! Posts expression graphs to `value:compute` for statistics and series, and
//! creates map entities for tile serving. Authentication is a bearer token
//! supplied at construction; the session is verified once at startup via
//! [`EarthEngineClient::handshake`].

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use terradiff_core::error::{Result, TerradiffError};
use terradiff_core::models::{Observation, RegionStats, VisParams};
use terradiff_core::ports::{CompositeSpec, ImageService};

use crate::expr;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// API root, e.g. `https://earthengine.googleapis.com`.
    pub base_url: String,
    /// Cloud project registered for Earth Engine.
    pub project: String,
    /// OAuth access token.
    pub token: String,
}

pub struct EarthEngineClient {
    config: EngineConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ComputeResponse {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    name: String,
}

impl EarthEngineClient {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    /// Computes a constant to prove the token and project work before the
    /// server starts taking traffic.
    pub async fn handshake(&self) -> Result<()> {
        self.compute_value(expr::constant_expression(json!(1))).await.map(|_| ())
    }

    async fn compute_value(&self, expression: Value) -> Result<Value> {
        let url = format!("{}/v1/projects/{}/value:compute", self.config.base_url, self.config.project);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&json!({ "expression": expression }))
            .send()
            .await
            .map_err(|e| TerradiffError::EngineUnavailable { reason: e.to_string() })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TerradiffError::Engine { message: format!("{status}: {body}") });
        }

        let parsed: ComputeResponse = response
            .json()
            .await
            .map_err(|e| TerradiffError::Engine { message: format!("malformed compute response: {e}") })?;
        Ok(parsed.result)
    }

    /// Creates a map entity for the composite and returns its tile URL
    /// template.
    async fn create_map(&self, expression: Value, vis: &VisParams) -> Result<String> {
        let url = format!("{}/v1/projects/{}/maps", self.config.base_url, self.config.project);
        let body = json!({
            "expression": expression,
            "visualizationOptions": {
                "ranges": [{ "min": vis.min, "max": vis.max }],
                "paletteColors": vis.palette,
            }
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| TerradiffError::EngineUnavailable { reason: e.to_string() })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TerradiffError::Engine { message: format!("{status}: {body}") });
        }

        let parsed: MapResponse = response
            .json()
            .await
            .map_err(|e| TerradiffError::Engine { message: format!("malformed maps response: {e}") })?;
        Ok(format!("{}/v1/{}/tiles/{{z}}/{{x}}/{{y}}", self.config.base_url, parsed.name))
    }
}

#[async_trait]
impl ImageService for EarthEngineClient {
    async fn reduce_composite(&self, spec: &CompositeSpec) -> Result<Option<RegionStats>> {
        let definition = spec.index.definition();
        let expression = expr::composite_stats(&definition, &spec.aoi, &spec.range);
        let result = self.compute_value(expression).await?;
        tracing::debug!(index = %spec.index, "Composite reduction returned");
        Ok(parse_region_stats(&result, spec.index.band()))
    }

    async fn tile_for_composite(&self, spec: &CompositeSpec, vis: &VisParams) -> Result<String> {
        let definition = spec.index.definition();
        let expression = expr::composite_image(&definition, &spec.aoi, &spec.range);
        self.create_map(expression, vis).await
    }

    async fn observation_series(&self, spec: &CompositeSpec) -> Result<Vec<Observation>> {
        let definition = spec.index.definition();
        let expression = expr::series_table(&definition, &spec.aoi, &spec.range);
        let result = self.compute_value(expression).await?;
        parse_observations(&result)
    }
}

/// Reducer outputs come back keyed `<band>_mean` / `<band>_stdDev`; an AOI
/// with no valid pixels yields nulls, reported as `None`.
fn parse_region_stats(result: &Value, band: &str) -> Option<RegionStats> {
    let mean = result.get(format!("{band}_mean"))?.as_f64()?;
    let std_dev = result.get(format!("{band}_stdDev"))?.as_f64()?;
    Some(RegionStats { mean, std_dev })
}

/// The series table arrives as a feature collection whose properties carry
/// `date` and `value`.
fn parse_observations(result: &Value) -> Result<Vec<Observation>> {
    let features = result
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| TerradiffError::Engine {
            message: "series result has no features array".to_string(),
        })?;

    features
        .iter()
        .map(|feature| {
            let properties = feature.get("properties").ok_or_else(|| TerradiffError::Engine {
                message: "series feature has no properties".to_string(),
            })?;
            let date_text = properties.get("date").and_then(Value::as_str).ok_or_else(|| {
                TerradiffError::Engine { message: "series feature has no date".to_string() }
            })?;
            let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|e| {
                TerradiffError::Engine { message: format!("bad series date {date_text}: {e}") }
            })?;
            let value = properties.get("value").and_then(Value::as_f64);
            Ok(Observation { date, value })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_combined_reducer_output() {
        let result = json!({ "NDVI_mean": 0.42, "NDVI_stdDev": 0.07 });
        let stats = parse_region_stats(&result, "NDVI").unwrap();
        assert_eq!(stats.mean, 0.42);
        assert_eq!(stats.std_dev, 0.07);
    }

    #[test]
    fn null_reducer_output_is_none() {
        let result = json!({ "NDVI_mean": null, "NDVI_stdDev": null });
        assert!(parse_region_stats(&result, "NDVI").is_none());
        assert!(parse_region_stats(&json!({}), "NDVI").is_none());
    }

    #[test]
    fn wrong_band_prefix_is_none() {
        let result = json!({ "NDWI_mean": 0.1, "NDWI_stdDev": 0.2 });
        assert!(parse_region_stats(&result, "NDVI").is_none());
    }

    #[test]
    fn parses_observations_with_nulls() {
        let result = json!({
            "features": [
                { "properties": { "date": "2021-01-05", "value": 0.31 } },
                { "properties": { "date": "2021-01-10", "value": null } },
            ]
        });
        let observations = parse_observations(&result).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].value, Some(0.31));
        assert_eq!(observations[1].value, None);
        assert_eq!(observations[1].date, NaiveDate::from_ymd_opt(2021, 1, 10).unwrap());
    }

    #[test]
    fn missing_features_array_is_an_engine_error() {
        let err = parse_observations(&json!({ "rows": [] })).unwrap_err();
        assert!(matches!(err, TerradiffError::Engine { .. }));
    }
}
