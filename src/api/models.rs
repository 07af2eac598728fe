//! Request and response bodies of the HTTP API

use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::base64;
use crate::config::PlannerConfig;
use crate::error::{AppError, Result};
use crate::planner::Shot;
use crate::storyboard::{ImageUpload, StoryboardRequest, StoryboardResult};

/// Multipart form shared by both upload endpoints
#[derive(Debug, Default)]
pub struct StoryboardForm {
    pub prompt: Option<String>,
    pub shots: Option<String>,
    pub language: Option<String>,
    pub images: Vec<ImageUpload>,
}

impl StoryboardForm {
    /// Read the form, collecting file parts named `image_field`
    pub async fn read(mut multipart: Multipart, image_field: &str) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "prompt" => form.prompt = Some(field.text().await.map_err(malformed)?),
                "shots" => form.shots = Some(field.text().await.map_err(malformed)?),
                "language" => form.language = Some(field.text().await.map_err(malformed)?),
                n if n == image_field => {
                    let file_name = field.file_name().map(str::to_string);
                    let data = field.bytes().await.map_err(malformed)?;
                    form.images.push(ImageUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
                other => debug!(field = %other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Apply defaults and convert into a service request
    pub fn into_request(self, defaults: &PlannerConfig) -> Result<StoryboardRequest> {
        let prompt = self
            .prompt
            .ok_or_else(|| AppError::InvalidInput("prompt is required".to_string()))?;

        let shot_count = match self.shots.as_deref().map(str::trim) {
            None | Some("") => defaults.default_shots,
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                AppError::InvalidInput(format!("shots must be an integer, got '{}'", raw))
            })?,
        };

        Ok(StoryboardRequest {
            prompt,
            shot_count,
            language: language_or_default(self.language, defaults),
            images: self.images,
        })
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::InvalidInput(format!("Malformed multipart body: {}", e))
}

fn language_or_default(language: Option<String>, defaults: &PlannerConfig) -> String {
    language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| defaults.default_language.clone())
}

/// JSON body with base64-encoded images
#[derive(Debug, Deserialize)]
pub struct StoryboardJsonRequest {
    pub prompt: String,
    #[serde(default)]
    pub shots: Option<u32>,
    #[serde(default)]
    pub language: Option<String>,
    /// Base64 strings or `data:image/...` URLs
    #[serde(default)]
    pub images: Vec<String>,
}

impl StoryboardJsonRequest {
    pub fn into_request(self, defaults: &PlannerConfig) -> Result<StoryboardRequest> {
        let images = self
            .images
            .iter()
            .enumerate()
            .map(|(index, encoded)| {
                base64::decode(encoded)
                    .map(|data| ImageUpload {
                        file_name: None,
                        data,
                    })
                    .map_err(|e| AppError::InvalidImage {
                        index,
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StoryboardRequest {
            prompt: self.prompt,
            shot_count: self.shots.unwrap_or(defaults.default_shots),
            language: language_or_default(self.language, defaults),
            images,
        })
    }
}

/// Reduced shot shape of the `/generate-storyboard` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyShot {
    pub id: u32,
    pub title: String,
    pub movement: String,
    pub angle: String,
    pub duration_sec: f64,
}

impl From<&Shot> for LegacyShot {
    fn from(shot: &Shot) -> Self {
        Self {
            id: shot.id,
            title: shot.title.clone(),
            movement: shot.movement.clone(),
            angle: shot.camera_angle.clone(),
            duration_sec: shot.duration_sec,
        }
    }
}

/// Response of the `/generate-storyboard` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyStoryboardResponse {
    pub prompt: String,
    pub shots: Vec<LegacyShot>,
    pub annotated_images: Vec<String>,
}

impl From<StoryboardResult> for LegacyStoryboardResponse {
    fn from(result: StoryboardResult) -> Self {
        Self {
            shots: result.shots.iter().map(LegacyShot::from).collect(),
            prompt: result.prompt,
            annotated_images: result.annotated_images,
        }
    }
}
