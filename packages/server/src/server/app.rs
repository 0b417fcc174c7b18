//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vocab_extraction::{
    ai::Gemini, FileArtifactStore, HttpFetcher, LevelTable, MemoryJobStore, MemoryWordStore,
    Pipeline, SavedWordStore, ValidatedFetcher,
};

use crate::config::Config;
use crate::server::middleware::resolve_user;
use crate::server::routes::{
    add_saved_word, get_artifact, get_job_status, health_handler, list_saved_words,
    remove_saved_word, submit_job,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub saved_words: Arc<dyn SavedWordStore>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, saved_words: impl SavedWordStore + 'static) -> Self {
        Self {
            pipeline,
            saved_words: Arc::new(saved_words),
        }
    }
}

/// Wire the production pipeline from configuration.
pub fn build_state(config: &Config) -> Result<AppState> {
    let fetcher = HttpFetcher::with_timeout(config.fetch_timeout)
        .context("Failed to build HTTP client")?;

    let generator = Gemini::new()
        .with_model(config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone());

    let mut pipeline = Pipeline::new(
        ValidatedFetcher::new(fetcher),
        generator,
        MemoryJobStore::new(),
        FileArtifactStore::new(config.artifact_dir.clone()),
    )
    .with_levels(LevelTable::load(&config.level_table_path))
    .with_generation_timeout(config.generation_timeout);

    match &config.gemini_api_key {
        Some(key) => pipeline = pipeline.with_default_credential(key.as_str()),
        None => tracing::warn!("GEMINI_API_KEY not set; every request must supply api_key"),
    }

    Ok(AppState::new(pipeline, MemoryWordStore::new()))
}

/// Build the Axum application router
pub fn build_app(config: &Config) -> Result<Router> {
    let state = build_state(config)?;
    Ok(build_router(state, &config.allowed_origins))
}

/// Routes and middleware around an already-built state.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/jobs", post(submit_job))
        .route("/api/jobs/:job_id", get(get_job_status))
        .route("/api/artifacts/:artifact_id", get(get_artifact))
        .route(
            "/api/saved-words",
            get(list_saved_words).post(add_saved_word),
        )
        .route("/api/saved-words/:surface", delete(remove_saved_word))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(resolve_user))
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-username"),
        ])
}
