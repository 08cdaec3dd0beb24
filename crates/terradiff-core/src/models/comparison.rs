//! Request-scoped types flowing through the comparison pipeline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Aoi;

/// Calendar-date range, end exclusive (the compute service's date filter
/// semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Span from the start of this range to the end of `other`, the window
    /// the time series covers.
    pub fn span_through(&self, other: &DateRange) -> DateRange {
        DateRange { start: self.start, end: other.end }
    }
}

/// Mean and standard deviation of a composite over the AOI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl RegionStats {
    /// Statistic map keyed the way the compute service names reducer outputs:
    /// `<band>_mean` and `<band>_stdDev`.
    pub fn to_named_map(&self, band: &str) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert(format!("{band}_mean"), self.mean.into());
        map.insert(format!("{band}_stdDev"), self.std_dev.into());
        map
    }
}

/// Display range and palette shared by both composites of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

impl VisParams {
    /// Symmetric-range rule: widen the range beyond either composite's own
    /// spread by twice the larger standard deviation, so both tile layers
    /// share one comparable color scale.
    pub fn bracket(stats1: &RegionStats, stats2: &RegionStats, palette: &[&str]) -> Self {
        let margin = 2.0 * stats1.std_dev.max(stats2.std_dev);
        Self {
            min: stats1.mean.min(stats2.mean) - margin,
            max: stats1.mean.max(stats2.mean) + margin,
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// One catalog observation reduced to its AOI mean. `value` is `None` when
/// the observation had no valid pixels over the AOI (clouds, swath gaps).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Parallel date/value sequences, ascending by date, with no missing values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Drops observations without a value and sorts the rest by acquisition
    /// date ascending. Catalog order is not trusted.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut kept: Vec<(NaiveDate, f64)> = observations
            .into_iter()
            .filter_map(|obs| obs.value.map(|v| (obs.date, v)))
            .collect();
        kept.sort_by_key(|(date, _)| *date);

        let mut series = TimeSeries::default();
        for (date, value) in kept {
            series.dates.push(date);
            series.values.push(value);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Everything a comparison request produces.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub tile_url1: String,
    pub tile_url2: String,
    pub stats1: RegionStats,
    pub stats2: RegionStats,
    pub series: TimeSeries,
    pub vis: VisParams,
    pub bounds: geojson::Geometry,
}

/// AOI plus the two ranges under comparison, as resolved for one request.
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub aoi: Aoi,
    pub range1: DateRange,
    pub range2: DateRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bracket_uses_larger_std_dev() {
        let s1 = RegionStats { mean: 0.2, std_dev: 0.05 };
        let s2 = RegionStats { mean: 0.6, std_dev: 0.1 };
        let vis = VisParams::bracket(&s1, &s2, &["blue", "red"]);
        assert!((vis.min - 0.0).abs() < 1e-12);
        assert!((vis.max - 0.8).abs() < 1e-12);
        assert_eq!(vis.palette, vec!["blue", "red"]);
    }

    #[test]
    fn series_drops_nulls_and_sorts() {
        let observations = vec![
            Observation { date: date(2021, 3, 1), value: Some(0.4) },
            Observation { date: date(2021, 1, 1), value: Some(0.2) },
            Observation { date: date(2021, 2, 1), value: None },
            Observation { date: date(2021, 1, 15), value: Some(0.3) },
        ];
        let series = TimeSeries::from_observations(observations);
        assert_eq!(series.len(), 3);
        assert_eq!(series.dates, vec![date(2021, 1, 1), date(2021, 1, 15), date(2021, 3, 1)]);
        assert_eq!(series.values, vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn span_through_covers_both_ranges() {
        let r1 = DateRange::new(date(2021, 1, 1), date(2021, 2, 1));
        let r2 = DateRange::new(date(2022, 1, 1), date(2022, 2, 1));
        let span = r1.span_through(&r2);
        assert_eq!(span.start, r1.start);
        assert_eq!(span.end, r2.end);
    }

    #[test]
    fn named_map_keys_follow_reducer_naming() {
        let map = RegionStats { mean: 0.5, std_dev: 0.1 }.to_named_map("NDVI");
        assert_eq!(map.get("NDVI_mean").and_then(|v| v.as_f64()), Some(0.5));
        assert_eq!(map.get("NDVI_stdDev").and_then(|v| v.as_f64()), Some(0.1));
    }

    proptest! {
        /// The bracket always contains both means, with a margin of exactly
        /// twice the larger standard deviation on each side.
        #[test]
        fn bracket_contains_both_means(
            mean1 in -1.0f64..1.0,
            mean2 in -1.0f64..1.0,
            std1 in 0.0f64..0.5,
            std2 in 0.0f64..0.5,
        ) {
            let s1 = RegionStats { mean: mean1, std_dev: std1 };
            let s2 = RegionStats { mean: mean2, std_dev: std2 };
            let vis = VisParams::bracket(&s1, &s2, &["blue"]);
            let lo = mean1.min(mean2);
            let hi = mean1.max(mean2);
            let margin = 2.0 * std1.max(std2);
            prop_assert!(vis.min <= lo);
            prop_assert!(hi <= vis.max);
            prop_assert!((lo - vis.min - margin).abs() < 1e-12);
            prop_assert!((vis.max - hi - margin).abs() < 1e-12);
        }
    }
}
