//! The index comparison pipeline.
//!
//! One parameterized pipeline serves all four indices; the
//! [`IndexDefinition`](crate::indices::IndexDefinition) supplies the source
//! collection, band math and palette. Any failure aborts the whole request:
//! there are no partial results, tile rendering included.

use std::sync::Arc;

use crate::error::{Result, TerradiffError};
use crate::indices::IndexKind;
use crate::models::{Comparison, ComparisonRequest, RegionStats, TimeSeries, VisParams};
use crate::ports::{CompositeSpec, ImageService};

pub struct ComparisonPipeline {
    engine: Arc<dyn ImageService>,
}

impl ComparisonPipeline {
    pub fn new(engine: Arc<dyn ImageService>) -> Self {
        Self { engine }
    }

    /// Compare an index between the request's two date ranges over its AOI.
    pub async fn compare(&self, index: IndexKind, request: &ComparisonRequest) -> Result<Comparison> {
        let definition = index.definition();

        let spec1 = CompositeSpec { index, aoi: request.aoi.clone(), range: request.range1 };
        let spec2 = CompositeSpec { index, aoi: request.aoi.clone(), range: request.range2 };

        let stats1 = self.stats_for(&spec1).await?;
        let stats2 = self.stats_for(&spec2).await?;
        tracing::debug!(
            index = %index,
            mean1 = stats1.mean,
            mean2 = stats2.mean,
            "Composite statistics computed"
        );

        // Both tile layers share one color scale so the two ranges are
        // visually comparable.
        let vis = VisParams::bracket(&stats1, &stats2, definition.palette);

        let tile_url1 = self.engine.tile_for_composite(&spec1, &vis).await?;
        let tile_url2 = self.engine.tile_for_composite(&spec2, &vis).await?;

        let span_spec = CompositeSpec {
            index,
            aoi: request.aoi.clone(),
            range: request.range1.span_through(&request.range2),
        };
        let observations = self.engine.observation_series(&span_spec).await?;
        let series = TimeSeries::from_observations(observations);
        tracing::debug!(index = %index, points = series.len(), "Time series assembled");

        Ok(Comparison {
            tile_url1,
            tile_url2,
            stats1,
            stats2,
            series,
            vis,
            bounds: request.aoi.bounds_polygon(),
        })
    }

    async fn stats_for(&self, spec: &CompositeSpec) -> Result<RegionStats> {
        self.engine.reduce_composite(spec).await?.ok_or_else(|| {
            TerradiffError::StatisticsUnavailable { band: spec.index.band().to_string() }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{Aoi, DateRange, Observation};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn square_aoi() -> Aoi {
        Aoi::from_polygon_rings(&[vec![
            [30.0, 50.0],
            [31.0, 50.0],
            [31.0, 51.0],
            [30.0, 51.0],
            [30.0, 50.0],
        ]])
        .unwrap()
    }

    fn request() -> ComparisonRequest {
        ComparisonRequest {
            aoi: square_aoi(),
            range1: DateRange::new(date(2021, 1, 1), date(2021, 2, 1)),
            range2: DateRange::new(date(2022, 1, 1), date(2022, 2, 1)),
        }
    }

    #[derive(Default)]
    struct ScriptedEngine {
        stats: HashMap<NaiveDate, Option<RegionStats>>,
        fail_tiles: bool,
        observations: Vec<Observation>,
        series_range: Mutex<Option<DateRange>>,
    }

    impl ScriptedEngine {
        fn with_stats(mut self, range_start: NaiveDate, stats: Option<RegionStats>) -> Self {
            self.stats.insert(range_start, stats);
            self
        }
    }

    #[async_trait]
    impl ImageService for ScriptedEngine {
        async fn reduce_composite(&self, spec: &CompositeSpec) -> Result<Option<RegionStats>> {
            Ok(self.stats.get(&spec.range.start).copied().flatten())
        }

        async fn tile_for_composite(&self, spec: &CompositeSpec, _vis: &VisParams) -> Result<String> {
            if self.fail_tiles {
                return Err(TerradiffError::Engine { message: "tile render failed".to_string() });
            }
            Ok(format!("https://tiles.test/{}/{}", spec.index.band(), spec.range.start))
        }

        async fn observation_series(&self, spec: &CompositeSpec) -> Result<Vec<Observation>> {
            *self.series_range.lock().unwrap() = Some(spec.range);
            Ok(self.observations.clone())
        }
    }

    fn scripted() -> ScriptedEngine {
        ScriptedEngine::default()
            .with_stats(date(2021, 1, 1), Some(RegionStats { mean: 0.2, std_dev: 0.05 }))
            .with_stats(date(2022, 1, 1), Some(RegionStats { mean: 0.6, std_dev: 0.1 }))
    }

    #[tokio::test]
    async fn compare_brackets_vis_params() {
        let pipeline = ComparisonPipeline::new(Arc::new(scripted()));
        let result = pipeline.compare(IndexKind::Ndvi, &request()).await.unwrap();
        assert!((result.vis.min - 0.0).abs() < 1e-12);
        assert!((result.vis.max - 0.8).abs() < 1e-12);
        assert_eq!(result.stats1.mean, 0.2);
        assert_eq!(result.stats2.mean, 0.6);
        assert!(result.tile_url1.contains("NDVI"));
        assert_ne!(result.tile_url1, result.tile_url2);
    }

    #[tokio::test]
    async fn empty_reduction_is_statistics_unavailable() {
        let engine = ScriptedEngine::default()
            .with_stats(date(2021, 1, 1), None)
            .with_stats(date(2022, 1, 1), Some(RegionStats { mean: 0.6, std_dev: 0.1 }));
        let pipeline = ComparisonPipeline::new(Arc::new(engine));
        let err = pipeline.compare(IndexKind::Savi, &request()).await.unwrap_err();
        match err {
            TerradiffError::StatisticsUnavailable { band } => assert_eq!(band, "SAVI"),
            other => panic!("expected StatisticsUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tile_failure_aborts_the_comparison() {
        let mut engine = scripted();
        engine.fail_tiles = true;
        let pipeline = ComparisonPipeline::new(Arc::new(engine));
        let err = pipeline.compare(IndexKind::Ndvi, &request()).await.unwrap_err();
        assert!(matches!(err, TerradiffError::Engine { .. }));
    }

    #[tokio::test]
    async fn series_spans_both_ranges_and_drops_nulls() {
        let mut engine = scripted();
        engine.observations = vec![
            Observation { date: date(2021, 6, 1), value: Some(0.5) },
            Observation { date: date(2021, 1, 10), value: Some(0.3) },
            Observation { date: date(2021, 9, 1), value: None },
        ];
        let engine = Arc::new(engine);
        let pipeline = ComparisonPipeline::new(engine.clone());
        let result = pipeline.compare(IndexKind::Ndvi, &request()).await.unwrap();

        assert_eq!(result.series.dates, vec![date(2021, 1, 10), date(2021, 6, 1)]);
        assert_eq!(result.series.values, vec![0.3, 0.5]);

        let seen = engine.series_range.lock().unwrap().unwrap();
        assert_eq!(seen.start, date(2021, 1, 1));
        assert_eq!(seen.end, date(2022, 2, 1));
    }

    #[tokio::test]
    async fn bounds_cover_the_aoi() {
        let pipeline = ComparisonPipeline::new(Arc::new(scripted()));
        let result = pipeline.compare(IndexKind::Ndwi, &request()).await.unwrap();
        match result.bounds.value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings[0][0], vec![30.0, 50.0]);
                assert_eq!(rings[0][2], vec![31.0, 51.0]);
            }
            other => panic!("expected Polygon bounds, got {other:?}"),
        }
    }
}
