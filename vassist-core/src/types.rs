//! Detection data model shared by the vision, speech and pipeline crates

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in frame pixel coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

impl From<(f32, f32, f32, f32)> for BoundingBox {
    fn from((x, y, width, height): (f32, f32, f32, f32)) -> Self {
        Self::new(x, y, width, height)
    }
}

/// One labeled, confidence-scored box produced for a single frame.
///
/// Detections are produced fresh on every cycle and kept in the order the
/// detection engine returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Score in `[0, 1]`
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    /// Create a detection, clamping the score into `[0, 1]`.
    /// Non-finite scores collapse to zero.
    pub fn new(label: impl Into<String>, confidence: f32, bbox: impl Into<BoundingBox>) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            label: label.into(),
            confidence,
            bbox: bbox.into(),
        }
    }

    /// Confidence as a whole percentage, rounded half away from zero
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Narration style requested alongside a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NarrationMode {
    /// Labels with confidence
    #[default]
    Quick,
    /// Labels with left/center/right position
    Detailed,
}

/// A captured video frame (RGBA8, row-major)
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Bytes,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Bytes) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Solid black frame, useful when only the dimensions matter
    pub fn blank(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            pixels: Bytes::from(vec![0u8; len]),
        }
    }

    /// True when the pixel buffer matches the declared dimensions
    pub fn is_consistent(&self) -> bool {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(4))
            .map(|len| len == self.pixels.len())
            .unwrap_or(false)
    }
}
