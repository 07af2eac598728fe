//! Storyboard job orchestration

use chrono::Utc;
use futures::future::try_join_all;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::annotate::{Annotator, OverlayAnnotator, OverlayText};
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::planner::{
    Captioner, DimensionCaptioner, LlmShotGenerator, PlanRequest, ShotPlanner, MAX_SHOTS,
    MIN_SHOTS,
};
use crate::storage::{annotated_file_name, input_file_name, WorkspaceRoot, MANIFEST_FILE};
use crate::storyboard::{ImageUpload, JobManifest, StoryboardRequest, StoryboardResult};

/// Runs storyboard jobs: decode, persist, plan, annotate
pub struct StoryboardService {
    workspaces: WorkspaceRoot,
    planner: ShotPlanner,
    annotator: Arc<dyn Annotator>,
    captioner: Arc<dyn Captioner>,
    jpeg_quality: u8,
}

impl StoryboardService {
    pub fn new(
        workspaces: WorkspaceRoot,
        planner: ShotPlanner,
        annotator: Arc<dyn Annotator>,
        captioner: Arc<dyn Captioner>,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            workspaces,
            planner,
            annotator,
            captioner,
            jpeg_quality,
        }
    }

    /// Build the service described by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let planner = if settings.llm.enabled {
            let generator = LlmShotGenerator::new(&settings.llm)?;
            info!(
                endpoint = %settings.llm.endpoint,
                model = %settings.llm.model,
                "Text generation enabled for shot planning"
            );
            ShotPlanner::with_primary(
                Arc::new(generator),
                Duration::from_millis(settings.llm.timeout_ms),
            )
        } else {
            ShotPlanner::heuristic()
        };

        let annotator = OverlayAnnotator::from_config(&settings.annotate)?;

        Ok(Self::new(
            WorkspaceRoot::new(&settings.storage.base_path, &settings.storage.url_prefix),
            planner,
            Arc::new(annotator),
            Arc::new(DimensionCaptioner),
            settings.storage.jpeg_quality,
        ))
    }

    pub fn workspaces(&self) -> &WorkspaceRoot {
        &self.workspaces
    }

    /// Run one storyboard job
    ///
    /// Input is validated and every image decoded before the workspace is
    /// created. Later failures abort the job but may leave files behind.
    pub async fn create(&self, request: StoryboardRequest) -> Result<StoryboardResult> {
        request.validate()?;
        let StoryboardRequest {
            prompt,
            shot_count,
            language,
            images,
        } = request;

        let frames = decode_all(images).await?;
        let workspace = self.workspaces.create_job().await?;
        let job_id = workspace.job_id().to_string();
        info!(job_id = %job_id, images = frames.len(), shots = shot_count, "Storyboard job started");

        let mut input_images = Vec::with_capacity(frames.len());
        let mut captions = Vec::with_capacity(frames.len());
        for (i, frame) in frames.iter().enumerate() {
            captions.push(self.captioner.caption(frame));

            let frame = frame.clone();
            let quality = self.jpeg_quality;
            let data = run_blocking(move || encode_jpeg(&frame, quality)).await?;
            input_images.push(workspace.write_file(&input_file_name(i + 1), &data).await?);
        }

        let shots = self
            .planner
            .plan(&PlanRequest {
                prompt: prompt.clone(),
                captions,
                shot_count,
                language: language.clone(),
            })
            .await;
        if shots.is_empty() {
            return Err(AppError::Internal("Planner produced an empty plan".to_string()));
        }

        let mut annotated_images = Vec::with_capacity(frames.len());
        for (i, frame) in frames.iter().enumerate() {
            // Fewer shots than images repeats the plan
            let shot = &shots[i % shots.len()];
            let text = OverlayText::from(shot);
            let annotator = self.annotator.clone();
            let frame = frame.clone();
            let quality = self.jpeg_quality;

            let data = run_blocking(move || {
                let annotated = annotator.annotate(&frame, &text)?;
                encode_jpeg(&annotated, quality)
            })
            .await
            .map_err(|e| AppError::Internal(format!("Annotating image {} failed: {}", i, e)))?;

            annotated_images.push(workspace.write_file(&annotated_file_name(i + 1), &data).await?);
            debug!(job_id = %job_id, image = i, shot = shot.id, "Annotated image");
        }

        let manifest = JobManifest {
            job_id: job_id.clone(),
            created_at: Utc::now(),
            prompt: prompt.clone(),
            language: language.clone(),
            shots: shots.clone(),
            input_images,
            annotated_images: annotated_images.clone(),
        };
        workspace.write_json(MANIFEST_FILE, &manifest).await?;

        info!(job_id = %job_id, shots = shots.len(), "Storyboard job completed");

        Ok(StoryboardResult {
            job_id,
            prompt,
            language,
            shots,
            annotated_images,
        })
    }

    /// Read the manifest of a finished job
    pub async fn manifest(&self, job_id: &str) -> Result<JobManifest> {
        self.workspaces.read_json(job_id, MANIFEST_FILE).await
    }
}

impl StoryboardRequest {
    /// Reject requests that cannot produce a storyboard
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(AppError::InvalidInput("prompt is required".to_string()));
        }

        if !(MIN_SHOTS..=MAX_SHOTS).contains(&self.shot_count) {
            return Err(AppError::InvalidInput(format!(
                "shots must be between {} and {}, got {}",
                MIN_SHOTS, MAX_SHOTS, self.shot_count
            )));
        }

        if self.images.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one image is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Decode every upload to RGB; an undecodable upload fails with its index
async fn decode_all(images: Vec<ImageUpload>) -> Result<Vec<Arc<RgbImage>>> {
    let tasks = images.into_iter().enumerate().map(|(index, upload)| {
        run_blocking(move || match decode_image(index, &upload.data) {
            Ok(image) => Ok(Arc::new(image)),
            Err(AppError::InvalidImage { index, reason }) => Err(AppError::InvalidImage {
                index,
                reason: match &upload.file_name {
                    Some(name) => format!("{} ({})", reason, name),
                    None => reason,
                },
            }),
            Err(e) => Err(e),
        })
    });
    try_join_all(tasks).await
}

/// Decode one upload and normalize it to 8-bit RGB
pub fn decode_image(index: usize, data: &[u8]) -> Result<RgbImage> {
    if data.is_empty() {
        return Err(AppError::InvalidImage {
            index,
            reason: "empty upload".to_string(),
        });
    }

    let image = image::load_from_memory(data).map_err(|e| AppError::InvalidImage {
        index,
        reason: e.to_string(),
    })?;
    Ok(image.to_rgb8())
}

/// Encode an RGB image as JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    image.write_with_encoder(encoder)?;
    Ok(buf)
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}
