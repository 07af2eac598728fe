//! Shot planning - heuristic and LLM-backed strategies with fallback

pub mod caption;
pub mod heuristic;
pub mod llm;
pub mod traits;

pub use caption::{Captioner, DimensionCaptioner};
pub use heuristic::HeuristicPlanner;
pub use llm::LlmShotGenerator;
pub use traits::{Framing, PlanRequest, Shot, ShotGenerator};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// Smallest plan a request may ask for
pub const MIN_SHOTS: u32 = 1;
/// Largest plan a request may ask for
pub const MAX_SHOTS: u32 = 12;

/// Planner that tries a primary generator and falls back to the heuristic
///
/// The primary gets a single attempt bounded by `timeout`. Transport
/// failures, timeouts, empty answers and plans that fail [`validate_plan`]
/// all resolve to the heuristic plan, so [`ShotPlanner::plan`] never fails.
pub struct ShotPlanner {
    primary: Option<Arc<dyn ShotGenerator>>,
    fallback: HeuristicPlanner,
    timeout: Duration,
}

impl ShotPlanner {
    /// Planner that only uses the heuristic
    pub fn heuristic() -> Self {
        Self {
            primary: None,
            fallback: HeuristicPlanner::new(),
            timeout: Duration::ZERO,
        }
    }

    /// Planner with a primary generator
    pub fn with_primary(primary: Arc<dyn ShotGenerator>, timeout: Duration) -> Self {
        Self {
            primary: Some(primary),
            fallback: HeuristicPlanner::new(),
            timeout,
        }
    }

    /// Produce a plan of `request.shot_count` shots
    pub async fn plan(&self, request: &PlanRequest) -> Vec<Shot> {
        if let Some(primary) = &self.primary {
            match self.try_primary(primary.as_ref(), request).await {
                Ok(shots) => {
                    debug!(generator = primary.name(), shots = shots.len(), "Using generated plan");
                    return shots;
                }
                Err(e) => {
                    warn!(
                        generator = primary.name(),
                        error = %e,
                        "Shot generation failed, falling back to heuristic"
                    );
                }
            }
        }

        self.fallback
            .plan(&request.prompt, request.shot_count, &request.language)
    }

    async fn try_primary(
        &self,
        primary: &dyn ShotGenerator,
        request: &PlanRequest,
    ) -> Result<Vec<Shot>> {
        let shots = tokio::time::timeout(self.timeout, primary.generate(request))
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{} did not answer within {}ms",
                    primary.name(),
                    self.timeout.as_millis()
                ))
            })??;

        validate_plan(&shots, request.shot_count)?;
        Ok(shots)
    }
}

/// Check that a generated plan has the canonical shape
pub fn validate_plan(shots: &[Shot], expected: u32) -> Result<()> {
    if shots.len() != expected as usize {
        return Err(AppError::Generation(format!(
            "Expected {} shots, got {}",
            expected,
            shots.len()
        )));
    }

    for (i, shot) in shots.iter().enumerate() {
        if shot.id as usize != i + 1 {
            return Err(AppError::Generation(format!(
                "Shot at position {} has id {}",
                i + 1,
                shot.id
            )));
        }

        let text_fields = [
            ("title", &shot.title),
            ("camera_angle", &shot.camera_angle),
            ("movement", &shot.movement),
            ("lens", &shot.lens),
        ];
        if let Some((field, _)) = text_fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AppError::Generation(format!(
                "Shot {} has an empty {}",
                shot.id, field
            )));
        }

        if !shot.duration_sec.is_finite() || shot.duration_sec <= 0.0 {
            return Err(AppError::Generation(format!(
                "Shot {} has invalid duration {}",
                shot.id, shot.duration_sec
            )));
        }
    }

    Ok(())
}
