//! Voice command dispatch for the camera view

use tracing::debug;
use vassist_core::NarrationMode;

/// Action requested by a spoken command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Quick detection ("detect")
    Detect,
    /// Detailed detection ("describe")
    Describe,
    /// Toggle live mode ("live")
    ToggleLive,
}

impl VoiceCommand {
    /// Narration mode for detection commands
    pub fn mode(&self) -> Option<NarrationMode> {
        match self {
            VoiceCommand::Detect => Some(NarrationMode::Quick),
            VoiceCommand::Describe => Some(NarrationMode::Detailed),
            VoiceCommand::ToggleLive => None,
        }
    }
}

/// Keywords in priority order. Substring match, so "detection" is a detect.
const KEYWORDS: &[(&str, VoiceCommand)] = &[
    ("detect", VoiceCommand::Detect),
    ("describe", VoiceCommand::Describe),
    ("live", VoiceCommand::ToggleLive),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct VoiceCommandDispatcher;

impl VoiceCommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// At most one command per transcript; unmatched speech yields `None`.
    pub fn dispatch(&self, transcript: &str) -> Option<VoiceCommand> {
        let lower = transcript.to_lowercase();
        let command = KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, command)| *command);
        if command.is_none() {
            debug!("No command in transcript: {}", transcript);
        }
        command
    }
}
