//! Unit tests for the overlay annotator

use image::{ImageFormat, Rgb, RgbImage};
use storyboard_gateway::annotate::{Annotator, OverlayAnnotator, OverlayText};
use storyboard_gateway::config::AnnotateConfig;
use storyboard_gateway::planner::HeuristicPlanner;

fn annotator() -> OverlayAnnotator {
    OverlayAnnotator::from_config(&AnnotateConfig::default()).unwrap()
}

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([90, 140, 200]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

#[test]
fn test_annotate_file_leaves_source_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("frame.png");
    let destination = dir.path().join("annotated.png");
    write_png(&source, 320, 180);
    let before = std::fs::read(&source).unwrap();

    let shot = &HeuristicPlanner::new().plan("dolly in", 2, "en")[1];
    let annotator = OverlayAnnotator::from_config(&AnnotateConfig::default()).unwrap();
    annotator
        .annotate_file(&source, &OverlayText::from(shot), &destination)
        .unwrap();

    assert_eq!(std::fs::read(&source).unwrap(), before);

    let annotated = image::open(&destination).unwrap().to_rgb8();
    let original = image::open(&source).unwrap().to_rgb8();
    assert_eq!(annotated.dimensions(), (320, 180));
    assert_ne!(annotated, original);
}

#[test]
fn test_plain_text_label_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("frame.png");
    let destination = dir.path().join("labelled.jpg");
    write_png(&source, 200, 200);

    annotator()
        .annotate_file(&source, &OverlayText::from("Opening shot"), &destination)
        .unwrap();

    assert!(destination.exists());
}

#[test]
fn test_missing_source_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = annotator().annotate_file(
        &dir.path().join("missing.png"),
        &OverlayText::from("x"),
        &dir.path().join("out.png"),
    );
    assert!(result.is_err());
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn test_unconfigured_font_still_renders_shot_text() {
    let plan = HeuristicPlanner::new().plan("dolly 45", 3, "en");
    let frame = RgbImage::from_pixel(400, 300, Rgb([90, 140, 200]));
    let annotator = OverlayAnnotator::from_config(&AnnotateConfig { font_path: None }).unwrap();

    let first = annotator.annotate(&frame, &OverlayText::from(&plan[0])).unwrap();
    let third = annotator.annotate(&frame, &OverlayText::from(&plan[2])).unwrap();
    assert_ne!(first, third);
}
