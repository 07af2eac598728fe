//! Storyboard jobs - request and result types and the orchestrating service

pub mod service;

pub use service::StoryboardService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planner::Shot;

/// One uploaded reference image
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name, if any
    pub file_name: Option<String>,
    /// Encoded image bytes
    pub data: Vec<u8>,
}

/// A request to build a storyboard
#[derive(Debug, Clone)]
pub struct StoryboardRequest {
    pub prompt: String,
    pub shot_count: u32,
    pub language: String,
    pub images: Vec<ImageUpload>,
}

/// Outcome of a storyboard job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryboardResult {
    pub job_id: String,
    pub prompt: String,
    pub language: String,
    pub shots: Vec<Shot>,
    /// One URL per input image, in input order
    pub annotated_images: Vec<String>,
}

/// Record of a finished job, stored in its workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobManifest {
    pub job_id: String,
    pub created_at: DateTime<Utc>,
    pub prompt: String,
    pub language: String,
    pub shots: Vec<Shot>,
    pub input_images: Vec<String>,
    pub annotated_images: Vec<String>,
}
