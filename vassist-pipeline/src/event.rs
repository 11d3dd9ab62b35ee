//! Events consumed by the pipeline

use std::fmt;
use vassist_core::NarrationMode;
use vassist_eye::{DetectionReport, VisionError};
use vassist_sc::ListenerEvent;

/// Where a detection request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// Button press
    Manual,
    /// Spoken command
    Voice,
}

/// Visible view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Camera,
    Chat,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Camera => write!(f, "camera"),
            Tab::Chat => write!(f, "chat"),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    DetectRequested {
        mode: NarrationMode,
        source: DetectionSource,
    },
    ToggleLive,
    /// One display frame has elapsed
    DisplayRefresh,
    DetectionCompleted {
        mode: NarrationMode,
        outcome: Result<DetectionReport, VisionError>,
    },
    /// The detection engine finished loading (or failed to)
    ModelLoaded(Result<(), String>),
    Transcript(String),
    RecognitionFailed(String),
    StartListening,
    SetMuted(bool),
    ToggleMute,
    SelectTab(Tab),
    /// Narrate arbitrary text
    Say(String),
    Shutdown,
}

impl From<ListenerEvent> for Event {
    fn from(event: ListenerEvent) -> Self {
        match event {
            ListenerEvent::Transcript(transcript) => Event::Transcript(transcript.text),
            ListenerEvent::Failed(message) => Event::RecognitionFailed(message),
        }
    }
}
