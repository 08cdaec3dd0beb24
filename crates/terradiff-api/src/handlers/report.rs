use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// Serves the pre-generated comparison report as a download. Report
/// generation itself happens out of band; if nothing has been generated yet
/// this is a 404.
pub async fn download_report(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let path = &state.report_path;
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Report not available");
        ApiError::not_found("Report not generated yet")
            .with_details(format!("no report at {}", path.display()))
    })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report.pdf");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        bytes,
    ))
}
