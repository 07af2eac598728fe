//! Shot model and the generator trait shared by planning strategies

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Shot framing vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framing {
    /// Wide shot
    #[serde(rename = "WS", alias = "wide", alias = "ws")]
    Wide,
    /// Medium shot
    #[serde(rename = "MS", alias = "medium", alias = "ms")]
    Medium,
    /// Close-up
    #[serde(rename = "CU", alias = "close", alias = "cu")]
    Close,
    /// Extreme close-up
    #[serde(rename = "ECU", alias = "extreme-close", alias = "ecu")]
    ExtremeClose,
}

impl Framing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framing::Wide => "WS",
            Framing::Medium => "MS",
            Framing::Close => "CU",
            Framing::ExtremeClose => "ECU",
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned camera setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// 1-based position in the plan
    pub id: u32,
    pub title: String,
    pub framing: Framing,
    pub camera_angle: String,
    pub movement: String,
    /// Focal-length label, e.g. `35mm`
    pub lens: String,
    pub duration_sec: f64,
    pub notes: String,
}

/// Input to a planning strategy
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Creative brief
    pub prompt: String,
    /// One caption per reference image, in input order
    pub captions: Vec<String>,
    /// Number of shots wanted
    pub shot_count: u32,
    /// Language tag, e.g. `fa` or `en`
    pub language: String,
}

/// A strategy that turns a brief into an ordered shot plan
#[async_trait]
pub trait ShotGenerator: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Produce a plan for the request
    async fn generate(&self, request: &PlanRequest) -> Result<Vec<Shot>>;
}
