//! Deterministic synthetic engine.
//!
//! Stands in for Earth Engine in tests and when no credentials are
//! configured: plausible per-index statistics, a repeatable observation
//! series with occasional cloud gaps, and fake tile URLs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, Duration};
use terradiff_core::error::Result;
use terradiff_core::models::{DateRange, Observation, RegionStats, VisParams};
use terradiff_core::ports::{CompositeSpec, ImageService};
use terradiff_core::IndexKind;

const OBSERVATION_CADENCE_DAYS: i64 = 6;
// Every Nth observation is a cloud gap with no reducible pixels.
const GAP_EVERY: usize = 5;

pub struct MockEngine {
    stats: HashMap<IndexKind, Option<RegionStats>>,
    tile_base: String,
}

impl Default for MockEngine {
    fn default() -> Self {
        let mut stats = HashMap::new();
        stats.insert(IndexKind::Ndvi, Some(RegionStats { mean: 0.52, std_dev: 0.11 }));
        stats.insert(IndexKind::Rvi, Some(RegionStats { mean: 0.63, std_dev: 0.18 }));
        stats.insert(IndexKind::Ndwi, Some(RegionStats { mean: -0.21, std_dev: 0.09 }));
        stats.insert(IndexKind::Savi, Some(RegionStats { mean: 0.34, std_dev: 0.12 }));
        Self { stats, tile_base: "https://tiles.terradiff.invalid".to_string() }
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, index: IndexKind, stats: RegionStats) -> Self {
        self.stats.insert(index, Some(stats));
        self
    }

    /// Simulate an AOI with no valid observations for `index`.
    pub fn with_no_data(mut self, index: IndexKind) -> Self {
        self.stats.insert(index, None);
        self
    }

    fn base_stats(&self, index: IndexKind) -> Option<RegionStats> {
        self.stats.get(&index).copied().flatten()
    }
}

/// Small deterministic per-range nudge so the two composites of a comparison
/// never come out identical.
fn range_offset(range: &DateRange) -> f64 {
    f64::from(range.start.ordinal() % 17) / 100.0
}

#[async_trait]
impl ImageService for MockEngine {
    async fn reduce_composite(&self, spec: &CompositeSpec) -> Result<Option<RegionStats>> {
        Ok(self.base_stats(spec.index).map(|stats| RegionStats {
            mean: stats.mean + range_offset(&spec.range),
            std_dev: stats.std_dev,
        }))
    }

    async fn tile_for_composite(&self, spec: &CompositeSpec, _vis: &VisParams) -> Result<String> {
        Ok(format!(
            "{}/{}/{}_{}/tiles/{{z}}/{{x}}/{{y}}",
            self.tile_base,
            spec.index.band().to_ascii_lowercase(),
            spec.range.start,
            spec.range.end,
        ))
    }

    async fn observation_series(&self, spec: &CompositeSpec) -> Result<Vec<Observation>> {
        let Some(stats) = self.base_stats(spec.index) else {
            return Ok(Vec::new());
        };

        let mut observations = Vec::new();
        let mut date = spec.range.start;
        let mut count = 0usize;
        while date < spec.range.end {
            let value = if count % GAP_EVERY == GAP_EVERY - 1 {
                None
            } else {
                Some(stats.mean + stats.std_dev * (count as f64 * 0.7).sin())
            };
            observations.push(Observation { date, value });
            date += Duration::days(OBSERVATION_CADENCE_DAYS);
            count += 1;
        }
        Ok(observations)
    }
}
