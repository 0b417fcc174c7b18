//! Job submission and status polling.
//!
//! POST /api/jobs          → 202 `{job_id}`
//! GET  /api/jobs/:job_id  → status report (`not_found` for unknown ids)

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use vocab_extraction::{JobId, JobRequest, JobSubmission, StatusReport};

use crate::server::app::AppState;
use crate::server::error::ApiResult;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
}

/// Validate a submission and start it in the background.
///
/// Unreadable bodies, missing fields and missing credentials are rejected
/// with 400 before any job is created.
pub async fn submit_job(
    Extension(state): Extension<AppState>,
    body: Result<Json<JobSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let Json(submission) = body?;
    let request = JobRequest::try_from(submission)?;
    let job_id = state.pipeline.submit(request).await?;
    Ok((StatusCode::ACCEPTED, Json(SubmitResponse { job_id })))
}

pub async fn get_job_status(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<StatusReport>> {
    let report = state.pipeline.status(&JobId::new(job_id)).await?;
    Ok(Json(report))
}
