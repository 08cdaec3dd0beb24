//! Boundary to the remote geospatial compute service.
//!
//! Adapters (the Earth Engine REST client, the synthetic engine) implement
//! [`ImageService`]; the pipeline only ever sees typed inputs and outputs.

use async_trait::async_trait;

use crate::error::Result;
use crate::indices::IndexKind;
use crate::models::{Aoi, DateRange, Observation, RegionStats, VisParams};

/// Spatial resolution for every reduction, in the service's distance units
/// per pixel.
pub const REDUCTION_SCALE: f64 = 10.0;

/// Pixel budget per reduction, generous enough that large AOIs are not
/// truncated.
pub const MAX_PIXELS: f64 = 1e13;

/// One index composite: the temporal mean of the index over a date range,
/// clipped to the AOI.
#[derive(Debug, Clone)]
pub struct CompositeSpec {
    pub index: IndexKind,
    pub aoi: Aoi,
    pub range: DateRange,
}

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Mean and standard deviation of the composite over the AOI.
    /// `None` when the reduction finds no valid pixels.
    async fn reduce_composite(&self, spec: &CompositeSpec) -> Result<Option<RegionStats>>;

    /// Tile URL template for the composite rendered under `vis`.
    async fn tile_for_composite(&self, spec: &CompositeSpec, vis: &VisParams) -> Result<String>;

    /// Per-observation AOI means across the spec's range, tagged with
    /// calendar-date acquisition dates. Observations with no valid pixels
    /// carry `value: None`; callers decide what to do with them.
    async fn observation_series(&self, spec: &CompositeSpec) -> Result<Vec<Observation>>;
}
