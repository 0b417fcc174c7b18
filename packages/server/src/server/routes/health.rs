use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    jobs_tracked: usize,
    level_entries: usize,
}

/// Health check endpoint
///
/// Reports the number of tracked jobs and loaded level-table entries. An
/// empty level table is not unhealthy; classification just yields
/// `Unclassified` everywhere.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, jobs_tracked) = match state.pipeline.job_count().await {
        Ok(count) => (StatusCode::OK, "healthy", count),
        Err(e) => {
            tracing::error!(error = %e, "Job store unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", 0)
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            jobs_tracked,
            level_entries: state.pipeline.levels().len(),
        }),
    )
}
