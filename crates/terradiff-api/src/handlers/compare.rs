use std::sync::Arc;

use axum::{extract::State, Json};
use terradiff_core::IndexKind;

use crate::dto::{CompareRequest, CompareResponse};
use crate::error::ApiError;
use crate::services::ComparisonService;
use crate::state::AppState;

pub async fn compare_ndvi(
    state: State<Arc<AppState>>,
    body: Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    run(IndexKind::Ndvi, state, body).await
}

pub async fn compare_rvi(
    state: State<Arc<AppState>>,
    body: Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    run(IndexKind::Rvi, state, body).await
}

pub async fn compare_ndwi(
    state: State<Arc<AppState>>,
    body: Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    run(IndexKind::Ndwi, state, body).await
}

pub async fn compare_savi(
    state: State<Arc<AppState>>,
    body: Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    run(IndexKind::Savi, state, body).await
}

async fn run(
    index: IndexKind,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    tracing::info!(
        index = %index,
        start1 = %request.start1,
        end1 = %request.end1,
        start2 = %request.start2,
        end2 = %request.end2,
        has_request_aoi = request.aoi.is_some(),
        "Processing comparison request"
    );

    let comparison = ComparisonService::execute(&state, index, &request).await.map_err(|e| {
        tracing::error!(error = %e, index = %index, "Comparison failed");
        ApiError::internal(format!("Error occurred during {} computation: {}", index.band(), e))
            .with_details(e.kind())
    })?;

    Ok(Json(CompareResponse::from_comparison(index, comparison)))
}
