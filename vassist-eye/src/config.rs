//! Configuration for vassist-eye

use serde::{Deserialize, Serialize};

/// Vision system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Requested camera resolution (width, height)
    pub resolution: (u32, u32),
    /// Detector backbone identifier handed to the engine
    pub model_base: String,
    /// Detections scoring below this are discarded by the adapter
    pub min_confidence: f32,
    /// Upper bound on detections kept per frame
    pub max_detections: usize,
    /// Overlay stroke and label plate color (RGBA)
    pub overlay_color: [u8; 4],
    /// Label text color (RGBA)
    pub label_text_color: [u8; 4],
    /// Overlay stroke width in pixels
    pub stroke_width: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            resolution: (640, 480),
            model_base: "mobilenet_v2".to_string(),
            min_confidence: 0.0,
            max_detections: 100,
            overlay_color: [0x93, 0x33, 0xea, 0xff],
            label_text_color: [0xff, 0xff, 0xff, 0xff],
            stroke_width: 2,
        }
    }
}

impl VisionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err("Resolution must be non-zero".to_string());
        }

        if self.resolution.0 > 7680 || self.resolution.1 > 4320 {
            return Err("Resolution too large (max 8K)".to_string());
        }

        if self.model_base.trim().is_empty() {
            return Err("Model base cannot be empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err("Minimum confidence must be between 0.0 and 1.0".to_string());
        }

        if self.max_detections == 0 {
            return Err("Max detections must be greater than 0".to_string());
        }

        if self.stroke_width == 0 || self.stroke_width > 32 {
            return Err("Stroke width must be between 1 and 32".to_string());
        }

        Ok(())
    }
}
