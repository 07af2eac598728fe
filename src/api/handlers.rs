//! HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::models::{LegacyStoryboardResponse, StoryboardForm, StoryboardJsonRequest};
use crate::error::{AppError, Result};
use crate::storyboard::{JobManifest, StoryboardResult};
use crate::AppState;

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /v1/storyboard` - multipart with `prompt`, `shots`, `language` and `images`
pub async fn create_storyboard(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<StoryboardResult>> {
    let form = StoryboardForm::read(multipart, "images").await?;
    let request = form.into_request(&state.settings.planner)?;
    let result = state.storyboard.create(request).await?;
    Ok(Json(result))
}

/// `POST /v1/storyboard/json` - same job with base64 images in a JSON body
pub async fn create_storyboard_json(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<StoryboardJsonRequest>, JsonRejection>,
) -> Result<Json<StoryboardResult>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let request = body.into_request(&state.settings.planner)?;
    let result = state.storyboard.create(request).await?;
    Ok(Json(result))
}

/// `POST /generate-storyboard` - multipart with `prompt` and `files`, reduced shot shape
pub async fn generate_storyboard(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<LegacyStoryboardResponse>> {
    let form = StoryboardForm::read(multipart, "files").await?;
    let request = form.into_request(&state.settings.planner)?;
    let result = state.storyboard.create(request).await?;
    Ok(Json(result.into()))
}

/// `GET /v1/jobs/:job_id`
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<JobManifest>> {
    let manifest = state.storyboard.manifest(&job_id).await?;
    Ok(Json(manifest))
}
