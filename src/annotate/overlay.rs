//! Caption band and frame overlay renderer

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::annotate::{font, Annotator, OverlayText};
use crate::config::AnnotateConfig;
use crate::error::Result;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME_COLOR: Rgb<u8> = Rgb([255, 196, 0]);
/// Fraction of the underlying pixel removed behind the text
const BAND_OPACITY: f32 = 0.6;
const FRAME_THICKNESS: u32 = 2;

/// Draws a darkened caption band along the bottom edge, the label text on
/// top of it, and a thin frame inset from the borders
pub struct OverlayAnnotator {
    font: FontVec,
}

impl OverlayAnnotator {
    pub fn new(font: FontVec) -> Self {
        Self { font }
    }

    /// Create an annotator using the configured, a system, or the bundled font
    pub fn from_config(config: &AnnotateConfig) -> Result<Self> {
        Ok(Self::new(font::discover_font(config.font_path.as_deref())?))
    }
}

impl Annotator for OverlayAnnotator {
    fn annotate(&self, image: &RgbImage, text: &OverlayText) -> Result<RgbImage> {
        let mut canvas = image.clone();
        let (width, height) = canvas.dimensions();
        if width == 0 || height == 0 {
            return Ok(canvas);
        }

        // Scale text with the shorter side so portrait frames stay legible
        let font_size = (width.min(height) as f32 * 0.045).max(12.0);
        let scale = PxScale::from(font_size);
        let line_height = (font_size * 1.35).ceil() as u32;
        let padding = (font_size * 0.6).ceil() as u32;

        if !text.is_empty() {
            let max_width = width.saturating_sub(padding * 2);
            let lines: Vec<String> = text
                .lines
                .iter()
                .filter(|l| !l.trim().is_empty())
                .flat_map(|l| wrap_line(&self.font, scale, l, max_width))
                .collect();

            let band_height = (lines.len() as u32 * line_height + padding * 2).min(height);
            let band_top = height - band_height;
            darken_rows(&mut canvas, band_top, BAND_OPACITY);

            for (i, line) in lines.iter().enumerate() {
                let y = band_top + padding + i as u32 * line_height;
                draw_text_mut(
                    &mut canvas,
                    TEXT_COLOR,
                    padding as i32,
                    y as i32,
                    scale,
                    &self.font,
                    line,
                );
            }
        }

        draw_frame(&mut canvas, padding / 2);
        Ok(canvas)
    }
}

/// Split `line` into pieces no wider than `max_width` pixels
///
/// Breaks at whitespace; a single word wider than the limit is broken
/// between characters.
fn wrap_line(font: &FontVec, scale: PxScale, line: &str, max_width: u32) -> Vec<String> {
    let fits = |s: &str| text_size(scale, font, s).0 <= max_width;
    if max_width == 0 || fits(line) {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            wrapped.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if current.chars().count() > 1 && !fits(&current) {
                current.pop();
                wrapped.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

/// Darken every row from `top` to the bottom edge
fn darken_rows(canvas: &mut RgbImage, top: u32, opacity: f32) {
    let keep = 1.0 - opacity.clamp(0.0, 1.0);
    let (width, height) = canvas.dimensions();
    for y in top..height {
        for x in 0..width {
            let pixel = canvas.get_pixel_mut(x, y);
            for channel in pixel.0.iter_mut() {
                *channel = (*channel as f32 * keep) as u8;
            }
        }
    }
}

fn draw_frame(canvas: &mut RgbImage, inset: u32) {
    let (width, height) = canvas.dimensions();
    for step in 0..FRAME_THICKNESS {
        let offset = inset + step;
        if width <= offset * 2 || height <= offset * 2 {
            break;
        }
        let rect = Rect::at(offset as i32, offset as i32)
            .of_size(width - offset * 2, height - offset * 2);
        draw_hollow_rect_mut(canvas, rect, FRAME_COLOR);
    }
}
