use std::sync::Arc;

use axum::{extract::Multipart, extract::State, Json};

use crate::dto::UploadResponse;
use crate::error::ApiError;
use crate::services::UploadService;
use crate::state::AppState;

pub async fn upload_aoi(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let (filename, data) = extract_file(&mut multipart).await?;

    if data.is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }

    tracing::info!(filename = %filename, size = data.len(), "Received AOI file");

    let aoi = UploadService::extract(&filename, &data).map_err(|e| {
        tracing::error!(error = %e, filename = %filename, "AOI extraction failed");
        ApiError::internal("Error extracting AOI from file").with_details(e.to_string())
    })?;

    let geometry = aoi.to_geojson();
    // The slot is only written after extraction succeeds; a bad upload never
    // clobbers a previously active AOI.
    *state.active_aoi.write().await = Some(aoi);

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        aoi: geometry,
    }))
}

async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::bad_request("Failed to parse multipart form").with_details(e.to_string())
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or("upload.geojson").to_string();
            let data = field.bytes().await.map_err(|e| {
                ApiError::bad_request("Failed to read file data").with_details(e.to_string())
            })?;
            return Ok((filename, data.to_vec()));
        }
    }

    Err(ApiError::bad_request("No file part")
        .with_details("Expected a 'file' field in the multipart form"))
}
