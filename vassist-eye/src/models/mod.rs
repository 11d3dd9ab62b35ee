//! Object-detection engine contract and bundled engines

pub mod scripted;

use crate::error::VisionError;
use async_trait::async_trait;
use vassist_core::{Detection, Frame};

pub use scripted::ScriptedDetector;

/// Contract for an external object-detection engine.
///
/// The engine is loaded once and then asked to label single frames. It owns
/// inference only: readiness gating, filtering and error normalization live
/// in [`crate::DetectionAdapter`].
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Engine identifier
    fn name(&self) -> &'static str;

    /// Load weights / warm up. Called once before the first `detect`.
    async fn load(&self) -> Result<(), VisionError>;

    /// Label one frame. Boxes are in frame pixel coordinates.
    async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, VisionError>;
}
