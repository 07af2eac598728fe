//! Deterministic keyword-driven shot planner

use async_trait::async_trait;

use crate::error::Result;
use crate::planner::traits::{Framing, PlanRequest, Shot, ShotGenerator};

/// Movement of the opening shot
pub const STATIC_MOVEMENT: &str = "static";
/// Movement when the brief asks for a dolly
pub const DOLLY_MOVEMENT: &str = "dolly in, slow";
/// Movement otherwise
pub const PAN_MOVEMENT: &str = "pan right, slow";

/// Angle when the brief mentions 45
pub const THREE_QUARTER_ANGLE: &str = "45° three-quarter";
pub const EYE_LEVEL_ANGLE: &str = "eye level";

pub const FRAMING_CYCLE: [Framing; 4] = [
    Framing::Wide,
    Framing::Medium,
    Framing::Close,
    Framing::ExtremeClose,
];
pub const LENS_CYCLE: [&str; 4] = ["24mm", "35mm", "50mm", "85mm"];

pub const SHOT_DURATION_SEC: f64 = 3.0;
pub const FINAL_SHOT_DURATION_SEC: f64 = 4.0;

pub const SHOT_NOTES: &str = "Keep shallow DoF; lock white balance; match eyeline.";

// English and Persian spellings
const DOLLY_KEYWORDS: [&str; 2] = ["dolly", "دالی"];
const ANGLE_KEYWORD: &str = "45";

/// Keyword heuristic planner; always succeeds
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPlanner;

impl HeuristicPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Build a plan of exactly `shot_count` shots
    pub fn plan(&self, prompt: &str, shot_count: u32, _language: &str) -> Vec<Shot> {
        let lowered = prompt.to_lowercase();
        let movement = if DOLLY_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            DOLLY_MOVEMENT
        } else {
            PAN_MOVEMENT
        };
        let angle = if prompt.contains(ANGLE_KEYWORD) {
            THREE_QUARTER_ANGLE
        } else {
            EYE_LEVEL_ANGLE
        };

        let count = shot_count as usize;
        (0..count)
            .map(|i| Shot {
                id: i as u32 + 1,
                title: format!("Shot {}", i + 1),
                framing: FRAMING_CYCLE[i % FRAMING_CYCLE.len()],
                camera_angle: angle.to_string(),
                movement: (if i == 0 { STATIC_MOVEMENT } else { movement }).to_string(),
                lens: LENS_CYCLE[i % LENS_CYCLE.len()].to_string(),
                duration_sec: if i + 1 < count {
                    SHOT_DURATION_SEC
                } else {
                    FINAL_SHOT_DURATION_SEC
                },
                notes: SHOT_NOTES.to_string(),
            })
            .collect()
    }
}

#[async_trait]
impl ShotGenerator for HeuristicPlanner {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn generate(&self, request: &PlanRequest) -> Result<Vec<Shot>> {
        Ok(self.plan(&request.prompt, request.shot_count, &request.language))
    }
}
