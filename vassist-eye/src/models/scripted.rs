//! Detector that replays recorded detection lists
//!
//! Stands in for the real engine when running without a model: each call to
//! `detect` returns the next recorded list, wrapping around at the end.

use crate::error::VisionError;
use crate::models::ObjectDetector;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use vassist_core::{Detection, Frame};

/// One step of a script: a detection list or a simulated engine failure
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    Detections(Vec<Detection>),
    Failure { error: String },
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    load_delay_ms: u64,
    #[serde(default)]
    inference_delay_ms: u64,
    #[serde(default)]
    fail_load: Option<String>,
    frames: Vec<ScriptStep>,
}

pub struct ScriptedDetector {
    steps: Vec<ScriptStep>,
    cursor: Mutex<usize>,
    load_delay: Duration,
    inference_delay: Duration,
    fail_load: Option<String>,
}

impl ScriptedDetector {
    /// Detector that cycles through the given detection lists
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self::from_steps(frames.into_iter().map(ScriptStep::Detections).collect())
    }

    pub fn from_steps(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            cursor: Mutex::new(0),
            load_delay: Duration::ZERO,
            inference_delay: Duration::ZERO,
            fail_load: None,
        }
    }

    /// Detector that never sees anything
    pub fn empty() -> Self {
        Self::new(vec![Vec::new()])
    }

    pub fn with_latency(mut self, load_delay: Duration, inference_delay: Duration) -> Self {
        self.load_delay = load_delay;
        self.inference_delay = inference_delay;
        self
    }

    /// Make `load` fail with the given message
    pub fn failing_load(mut self, message: impl Into<String>) -> Self {
        self.fail_load = Some(message.into());
        self
    }

    /// Parse a JSON fixture:
    ///
    /// ```text
    /// {"inference_delay_ms": 30,
    ///  "frames": [[{"label": ..., "confidence": ..., "bbox": {...}}], {"error": "..."}]}
    /// ```
    pub fn from_json(json: &str) -> Result<Self, VisionError> {
        let file: ScriptFile = serde_json::from_str(json)
            .map_err(|e| VisionError::Config(format!("Invalid detection fixture: {}", e)))?;
        if file.frames.is_empty() {
            return Err(VisionError::Config("Detection fixture has no frames".to_string()));
        }

        let mut detector = Self::from_steps(file.frames).with_latency(
            Duration::from_millis(file.load_delay_ms),
            Duration::from_millis(file.inference_delay_ms),
        );
        detector.fail_load = file.fail_load;
        Ok(detector)
    }

    pub fn from_path(path: &Path) -> Result<Self, VisionError> {
        let raw = std::fs::read_to_string(path)?;
        let detector = Self::from_json(&raw)?;
        info!("Loaded {} scripted frames from {}", detector.steps.len(), path.display());
        Ok(detector)
    }

    fn next_step(&self) -> Option<ScriptStep> {
        if self.steps.is_empty() {
            return None;
        }
        let mut cursor = self.cursor.lock();
        let step = self.steps[*cursor % self.steps.len()].clone();
        *cursor = cursor.wrapping_add(1);
        Some(step)
    }
}

#[async_trait]
impl ObjectDetector for ScriptedDetector {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn load(&self) -> Result<(), VisionError> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        if let Some(message) = &self.fail_load {
            return Err(VisionError::Model(message.clone()));
        }
        if self.steps.is_empty() {
            return Err(VisionError::Model("Script has no frames".to_string()));
        }
        Ok(())
    }

    async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, VisionError> {
        if !self.inference_delay.is_zero() {
            tokio::time::sleep(self.inference_delay).await;
        }
        debug!("Scripted detection on {}x{} frame", frame.width, frame.height);
        match self.next_step() {
            Some(ScriptStep::Detections(detections)) => Ok(detections),
            Some(ScriptStep::Failure { error }) => Err(VisionError::DetectionFailure(error)),
            None => Err(VisionError::DetectionFailure("Script has no frames".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_detector_cycles() {
        let detector = ScriptedDetector::new(vec![
            vec![Detection::new("cup", 0.8, (1.0, 1.0, 5.0, 5.0))],
            vec![],
        ]);
        detector.load().await.unwrap();
        let frame = Frame::blank(8, 8);

        assert_eq!(detector.detect(&frame).await.unwrap().len(), 1);
        assert!(detector.detect(&frame).await.unwrap().is_empty());
        assert_eq!(detector.detect(&frame).await.unwrap()[0].label, "cup");
    }

    #[tokio::test]
    async fn test_fixture_with_failure_step() {
        let json = r#"{
            "frames": [
                [{
                    "label": "person",
                    "confidence": 0.92,
                    "bbox": {"x": 10, "y": 50, "width": 100, "height": 200}
                }],
                {"error": "backend lost"}
            ]
        }"#;
        let detector = ScriptedDetector::from_json(json).unwrap();
        let frame = Frame::blank(300, 300);

        let first = detector.detect(&frame).await.unwrap();
        assert_eq!(first[0].label, "person");
        assert_eq!(first[0].bbox.x, 10.0);

        match detector.detect(&frame).await {
            Err(VisionError::DetectionFailure(msg)) => assert_eq!(msg, "backend lost"),
            other => panic!("Expected DetectionFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_fixture_without_frames_rejected() {
        assert!(matches!(
            ScriptedDetector::from_json(r#"{"frames": []}"#),
            Err(VisionError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_load() {
        let detector = ScriptedDetector::empty().failing_load("weights missing");
        match detector.load().await {
            Err(VisionError::Model(msg)) => assert!(msg.contains("weights")),
            other => panic!("Expected Model error, got {:?}", other),
        }
    }
}
