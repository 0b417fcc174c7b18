//! Per-user saved words.
//!
//! GET    /api/saved-words           → `{words}`
//! POST   /api/saved-words           → `{exists, message}`
//! DELETE /api/saved-words/:surface  → `{removed}`
//!
//! The user comes from [`UserId`], resolved by middleware.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use vocab_extraction::{SaveOutcome, SavedWord};

use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::UserId;

#[derive(Serialize)]
pub struct SavedWordsResponse {
    pub words: Vec<SavedWord>,
}

#[derive(Deserialize)]
pub struct SaveWordRequest {
    pub word: SavedWord,
}

#[derive(Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

pub async fn list_saved_words(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<UserId>,
) -> ApiResult<Json<SavedWordsResponse>> {
    let words = state.saved_words.list(user.as_str()).await?;
    Ok(Json(SavedWordsResponse { words }))
}

/// Save a word unless this user already has it.
pub async fn add_saved_word(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<UserId>,
    body: Result<Json<SaveWordRequest>, JsonRejection>,
) -> ApiResult<Json<SaveOutcome>> {
    let Json(SaveWordRequest { word }) = body?;
    if word.word.trim().is_empty() {
        return Err(ApiError::Validation("word is required".to_string()));
    }

    let surface = word.word.clone();
    let outcome = state.saved_words.add(user.as_str(), word).await?;
    info!(user = %user.as_str(), word = %surface, exists = outcome.exists, "Save word");
    Ok(Json(outcome))
}

pub async fn remove_saved_word(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<UserId>,
    Path(surface): Path<String>,
) -> ApiResult<Json<RemoveResponse>> {
    let removed = state.saved_words.remove(user.as_str(), &surface).await?;
    Ok(Json(RemoveResponse { removed }))
}
