//! Detection adapter driven by the bundled fixture

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vassist_core::{Frame, NarrationMode};
use vassist_eye::{
    DetectionAdapter, FrameRenderer, ModelStatus, NarrationFormatter, ScriptedDetector,
    VisionConfig, VisionError,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/living_room.json")
}

#[tokio::test(start_paused = true)]
async fn test_fixture_cycle_through_adapter() {
    let detector = ScriptedDetector::from_path(&fixture()).unwrap();
    let adapter = DetectionAdapter::new(Arc::new(detector), VisionConfig::default()).unwrap();
    let frame = Frame::blank(640, 480);

    assert!(matches!(adapter.detect(&frame).await, Err(VisionError::ModelUnavailable)));
    adapter.load().await.unwrap();
    assert_eq!(adapter.status(), ModelStatus::Ready);

    let first = adapter.detect(&frame).await.unwrap();
    assert_eq!(
        NarrationFormatter::format(NarrationMode::Quick, &first.detections, first.frame_width),
        "I see person with 92% confidence, couch with 81% confidence"
    );
    assert_eq!(
        NarrationFormatter::format(NarrationMode::Detailed, &first.detections, first.frame_width),
        "Detailed view: person on the left, couch in the center"
    );

    let second = adapter.detect(&frame).await.unwrap();
    assert_eq!(
        NarrationFormatter::format(NarrationMode::Detailed, &second.detections, 640),
        "Detailed view: cup on the right"
    );

    assert!(adapter.detect(&frame).await.unwrap().is_empty());
    assert!(matches!(adapter.detect(&frame).await, Err(VisionError::DetectionFailure(_))));
}

#[tokio::test(start_paused = true)]
async fn test_load_latency_is_simulated() {
    let detector = ScriptedDetector::from_path(&fixture()).unwrap();
    let adapter = DetectionAdapter::new(Arc::new(detector), VisionConfig::default()).unwrap();

    let started = tokio::time::Instant::now();
    adapter.load().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_confidence_floor_and_overlay() {
    let detector = ScriptedDetector::from_path(&fixture()).unwrap();
    let config = VisionConfig {
        min_confidence: 0.85,
        ..VisionConfig::default()
    };
    let renderer = FrameRenderer::new(&config);
    let adapter = DetectionAdapter::new(Arc::new(detector), config).unwrap();
    adapter.load().await.unwrap();

    let report = adapter.detect(&Frame::blank(640, 480)).await.unwrap();
    assert_eq!(report.detections.len(), 1);

    let overlay = renderer.render(&report.detections, report.frame_width, report.frame_height);
    assert_eq!(overlay.boxes[0].text, "person 92%");
    assert_eq!(overlay.rasterize().dimensions(), (640, 480));
}
