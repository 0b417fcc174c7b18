//! Rendered graph pages.
//!
//! GET /api/artifacts/:artifact_id
//!
//! Only ids the renderer generates are served; anything else (paths,
//! traversal, other extensions) is a 400 before the filesystem is touched.

use axum::{
    extract::{Extension, Path},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};

use crate::server::app::AppState;
use crate::server::error::ApiResult;

pub async fn get_artifact(
    Extension(state): Extension<AppState>,
    Path(artifact_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let html = state.pipeline.artifact(&artifact_id).await?;
    Ok(([(CONTENT_TYPE, "text/html; charset=utf-8")], html))
}
