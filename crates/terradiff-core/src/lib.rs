//! Core domain for terradiff: index definitions, the comparison pipeline,
//! the compute-service port, and AOI extraction from uploaded files.
//!
//! Everything that talks to the remote geospatial compute service goes
//! through the [`ports::ImageService`] trait; adapters live in the
//! `terradiff-engine` crate.

pub mod error;
pub mod formats;
pub mod indices;
pub mod models;
pub mod pipeline;
pub mod ports;

pub use error::{Result, TerradiffError};
pub use indices::{BandMath, IndexDefinition, IndexKind};
pub use models::{
    Aoi, Comparison, ComparisonRequest, DateRange, Observation, RegionStats, TimeSeries, VisParams,
};
pub use pipeline::ComparisonPipeline;
pub use ports::{CompositeSpec, ImageService};
