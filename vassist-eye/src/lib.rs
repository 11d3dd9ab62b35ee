//! vassist-eye: vision side of Vision Assist
//!
//! Wraps an external object-detection engine behind the [`ObjectDetector`]
//! contract, draws detection overlays for the live view and turns detection
//! lists into narration text.

pub mod adapter;
pub mod camera;
pub mod config;
pub mod error;
pub mod models;
pub mod narration;
pub mod render;

pub use adapter::{DetectionAdapter, DetectionReport, ModelStatus};
pub use camera::{FrameSlot, FrameSource, StillImageSource};
pub use config::VisionConfig;
pub use error::VisionError;
pub use models::{ObjectDetector, ScriptedDetector};
pub use narration::{HorizontalPosition, NarrationFormatter};
pub use render::{FrameRenderer, LatestOverlay, Overlay, OverlayBox, OverlaySink, Rect};
