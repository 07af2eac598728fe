//! Image annotation - renders a shot description onto a copy of a frame

pub mod font;
pub mod overlay;

pub use overlay::OverlayAnnotator;

use image::RgbImage;
use std::path::Path;

use crate::error::Result;
use crate::planner::Shot;

/// Text lines to render onto an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayText {
    pub lines: Vec<String>,
}

impl OverlayText {
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

impl From<&Shot> for OverlayText {
    fn from(shot: &Shot) -> Self {
        Self {
            lines: vec![
                format!("{}  [{} | {}]", shot.title, shot.framing, shot.lens),
                format!("Angle: {}", shot.camera_angle),
                format!("Move: {}", shot.movement),
                format!("Duration: {:.1}s", shot.duration_sec),
            ],
        }
    }
}

impl From<&str> for OverlayText {
    fn from(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }
}

impl From<String> for OverlayText {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

/// Renders overlay text onto images
pub trait Annotator: Send + Sync {
    /// Return an annotated copy of `image`
    fn annotate(&self, image: &RgbImage, text: &OverlayText) -> Result<RgbImage>;

    /// Read `source`, annotate it, and write the result to `destination`
    ///
    /// The output format follows the destination's extension. `source` is
    /// only read.
    fn annotate_file(&self, source: &Path, text: &OverlayText, destination: &Path) -> Result<()> {
        let image = image::open(source)?.to_rgb8();
        let annotated = self.annotate(&image, text)?;
        annotated.save(destination)?;
        Ok(())
    }
}
