//! Image captioning used as planner context

use image::RgbImage;

/// Produces a short description of a reference image
pub trait Captioner: Send + Sync {
    fn caption(&self, image: &RgbImage) -> String;
}

/// Placeholder captioner that only reports pixel dimensions
///
/// Stands in for a vision model; the output depends on nothing but the
/// image size.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionCaptioner;

impl Captioner for DimensionCaptioner {
    fn caption(&self, image: &RgbImage) -> String {
        format!("{}x{} scene, central subject likely.", image.width(), image.height())
    }
}
