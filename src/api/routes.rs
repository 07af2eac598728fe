//! Router construction

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::api::handlers;
use crate::AppState;

/// Build the application router
///
/// Job workspaces are served read-only under the storage URL prefix.
pub fn create_router(state: Arc<AppState>) -> Router {
    let workspaces = state.storyboard.workspaces();
    let static_files = ServeDir::new(workspaces.base_path());
    let serve_path = workspaces.url_prefix().to_string();
    let body_limit = state.settings.server.max_upload_mb * 1024 * 1024;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/storyboard", post(handlers::create_storyboard))
        .route("/v1/storyboard/json", post(handlers::create_storyboard_json))
        .route("/v1/jobs/:job_id", get(handlers::get_job))
        .route("/generate-storyboard", post(handlers::generate_storyboard))
        .nest_service(&serve_path, static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
