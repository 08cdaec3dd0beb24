use terradiff_core::models::{Aoi, ComparisonRequest, DateRange};
use terradiff_core::{Comparison, ComparisonPipeline, IndexKind, Result, TerradiffError};

use crate::dto::CompareRequest;
use crate::state::AppState;

/// Service for executing index comparisons
pub struct ComparisonService;

impl ComparisonService {
    pub async fn execute(
        state: &AppState,
        index: IndexKind,
        request: &CompareRequest,
    ) -> Result<Comparison> {
        let aoi = Self::resolve_aoi(state, request).await?;
        let resolved = ComparisonRequest {
            aoi,
            range1: DateRange::new(request.start1, request.end1),
            range2: DateRange::new(request.start2, request.end2),
        };

        let pipeline = ComparisonPipeline::new(state.engine.clone());
        pipeline.compare(index, &resolved).await
    }

    /// A file-derived AOI wins over the request body until cleared; the slot
    /// is read once here so the rest of the request sees a stable AOI.
    async fn resolve_aoi(state: &AppState, request: &CompareRequest) -> Result<Aoi> {
        if let Some(aoi) = state.active_aoi.read().await.clone() {
            tracing::debug!("Using file-derived AOI");
            return Ok(aoi);
        }

        let body = request.aoi.as_ref().ok_or_else(|| TerradiffError::InvalidAoi {
            reason: "no AOI in request and no uploaded AOI active".to_string(),
        })?;
        Aoi::from_polygon_rings(&body.geometry.coordinates)
    }
}
