//! Narration text for detection results

use vassist_core::{Detection, NarrationMode};

pub const NOTHING_DETECTED: &str = "No objects detected in view";
pub const QUICK_LEAD_IN: &str = "I see ";
pub const DETAILED_LEAD_IN: &str = "Detailed view: ";
const SEPARATOR: &str = ", ";

/// Coarse horizontal placement of a box inside the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalPosition {
    Left,
    Center,
    Right,
}

impl HorizontalPosition {
    /// Classify by the box's x-origin against the frame thirds.
    ///
    /// `x < w/3` is left, `x > 2w/3` is right and everything else,
    /// including both threshold values, is center.
    pub fn classify(x: f32, frame_width: f32) -> Self {
        if x < frame_width / 3.0 {
            HorizontalPosition::Left
        } else if x > (frame_width * 2.0) / 3.0 {
            HorizontalPosition::Right
        } else {
            HorizontalPosition::Center
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            HorizontalPosition::Left => "on the left",
            HorizontalPosition::Center => "in the center",
            HorizontalPosition::Right => "on the right",
        }
    }
}

/// Turns detection lists into spoken sentences
pub struct NarrationFormatter;

impl NarrationFormatter {
    /// `"I see person with 92% confidence, cup with 61% confidence"`
    pub fn format_quick(detections: &[Detection]) -> String {
        if detections.is_empty() {
            return NOTHING_DETECTED.to_string();
        }

        let clauses: Vec<String> = detections
            .iter()
            .map(|d| format!("{} with {}% confidence", d.label, d.confidence_percent()))
            .collect();
        format!("{}{}", QUICK_LEAD_IN, clauses.join(SEPARATOR))
    }

    /// `"Detailed view: person on the left, cup in the center"`
    pub fn format_detailed(detections: &[Detection], frame_width: u32) -> String {
        if detections.is_empty() {
            return NOTHING_DETECTED.to_string();
        }

        let width = frame_width as f32;
        let clauses: Vec<String> = detections
            .iter()
            .map(|d| {
                let position = HorizontalPosition::classify(d.bbox.x, width);
                format!("{} {}", d.label, position.phrase())
            })
            .collect();
        format!("{}{}", DETAILED_LEAD_IN, clauses.join(SEPARATOR))
    }

    pub fn format(mode: NarrationMode, detections: &[Detection], frame_width: u32) -> String {
        match mode {
            NarrationMode::Quick => Self::format_quick(detections),
            NarrationMode::Detailed => Self::format_detailed(detections, frame_width),
        }
    }
}
