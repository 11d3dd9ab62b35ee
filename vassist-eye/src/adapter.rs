//! Detection adapter: the single "detect one frame" operation
//!
//! Gates calls on engine readiness, normalizes engine output and folds every
//! engine-side error into [`VisionError::DetectionFailure`]. No retries.

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::models::ObjectDetector;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vassist_core::{Detection, Frame};

/// Engine load state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Result of one successful detection cycle
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub detections: Vec<Detection>,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl DetectionReport {
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

pub struct DetectionAdapter {
    detector: Arc<dyn ObjectDetector>,
    config: Arc<VisionConfig>,
    status: RwLock<ModelStatus>,
}

impl DetectionAdapter {
    pub fn new(
        detector: Arc<dyn ObjectDetector>,
        config: VisionConfig,
    ) -> Result<Self, VisionError> {
        config.validate().map_err(VisionError::Config)?;
        Ok(Self {
            detector,
            config: Arc::new(config),
            status: RwLock::new(ModelStatus::Loading),
        })
    }

    pub fn status(&self) -> ModelStatus {
        self.status.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        *self.status.read() == ModelStatus::Ready
    }

    pub fn engine_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Load the engine. The status ends up `Ready` or `Failed`.
    pub async fn load(&self) -> Result<(), VisionError> {
        *self.status.write() = ModelStatus::Loading;
        info!(
            "Loading detection engine '{}' ({})",
            self.detector.name(),
            self.config.model_base
        );

        match self.detector.load().await {
            Ok(()) => {
                *self.status.write() = ModelStatus::Ready;
                info!("Detection engine ready");
                Ok(())
            }
            Err(e) => {
                warn!("Detection engine failed to load: {}", e);
                *self.status.write() = ModelStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Run the engine on one frame.
    ///
    /// Fails with `ModelUnavailable` until `load` has succeeded. The returned
    /// list may be empty and keeps the engine's order.
    pub async fn detect(&self, frame: &Frame) -> Result<DetectionReport, VisionError> {
        if !self.is_ready() {
            debug!("Detection requested before engine is ready");
            return Err(VisionError::ModelUnavailable);
        }

        let raw = self.detector.detect(frame).await.map_err(|e| match e {
            VisionError::DetectionFailure(msg) => VisionError::DetectionFailure(msg),
            VisionError::ModelUnavailable => VisionError::ModelUnavailable,
            other => VisionError::DetectionFailure(other.to_string()),
        })?;

        let detections = self.normalize(raw);
        debug!("Detected {} objects", detections.len());

        Ok(DetectionReport {
            detections,
            frame_width: frame.width,
            frame_height: frame.height,
        })
    }

    fn normalize(&self, raw: Vec<Detection>) -> Vec<Detection> {
        raw.into_iter()
            .filter(|d| d.bbox.is_finite())
            .map(|d| Detection::new(d.label, d.confidence, d.bbox))
            .filter(|d| d.confidence >= self.config.min_confidence)
            .take(self.config.max_detections)
            .collect()
    }
}
