//! Domain model types.

pub mod aoi;
pub mod comparison;

pub use aoi::Aoi;
pub use comparison::{
    Comparison, ComparisonRequest, DateRange, Observation, RegionStats, TimeSeries, VisParams,
};
