use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend shell + health
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))

        // Index comparisons, one route per supported index
        .route("/compare_ndvi", post(handlers::compare_ndvi))
        .route("/compare_rvi", post(handlers::compare_rvi))
        .route("/compare_ndwi", post(handlers::compare_ndwi))
        .route("/compare_savi", post(handlers::compare_savi))

        // AOI file state
        .route("/upload", post(handlers::upload_aoi))
        .route("/clear_aoi", post(handlers::clear_aoi))

        // Report download
        .route("/download_report", post(handlers::download_report))

        .with_state(state)
}
