use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::MessageResponse;
use crate::state::AppState;

pub async fn clear_aoi(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    *state.active_aoi.write().await = None;
    tracing::info!("Active AOI cleared");
    Json(MessageResponse {
        message: "AOI cleared, please draw a new one.".to_string(),
    })
}
