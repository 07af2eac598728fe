//! Storyboard Gateway
//!
//! HTTP service that turns a creative brief and a set of reference frames
//! into a shot plan, and overlays each shot's description onto its frame.

pub mod annotate;
pub mod api;
pub mod config;
pub mod error;
pub mod planner;
pub mod storage;
pub mod storyboard;

pub use error::{AppError, Result};

use storyboard::StoryboardService;

/// Service context shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub storyboard: StoryboardService,
}

impl AppState {
    /// Build the context described by `settings`
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let storyboard = StoryboardService::from_settings(&settings)?;
        Ok(Self {
            settings,
            storyboard,
        })
    }
}
