//! Narration service: the only path from the pipeline to the speaker

use crate::config::{SpeechConfig, VoiceConfig};
use crate::engines::SpeechSynthesizer;
use crate::error::SpeechError;
use std::sync::Arc;
use tracing::{debug, info};
use vassist_core::MuteFlag;

/// What happened to a narration request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationOutcome {
    /// Handed to the engine after cancelling anything in flight
    Spoken,
    /// Dropped because narration is muted
    Suppressed,
}

/// Speaks narration so that only the most recent one is ever heard.
pub struct NarrationService {
    engine: Arc<dyn SpeechSynthesizer>,
    voice: VoiceConfig,
    muted: MuteFlag,
    enabled: bool,
}

impl NarrationService {
    pub fn new(
        engine: Arc<dyn SpeechSynthesizer>,
        config: &SpeechConfig,
        muted: MuteFlag,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;
        info!("Narration using '{}' engine", engine.name());
        Ok(Self {
            engine,
            voice: config.voice.clone(),
            muted,
            enabled: config.enabled,
        })
    }

    /// Cancel whatever is playing, then speak `text`.
    ///
    /// A muted service does nothing, not even cancel.
    pub fn speak(&self, text: &str) -> Result<NarrationOutcome, SpeechError> {
        if self.muted.is_muted() {
            debug!("Narration muted, dropping: {}", preview(text));
            return Ok(NarrationOutcome::Suppressed);
        }

        if text.trim().is_empty() {
            return Err(SpeechError::Synthesizer("Text cannot be empty".to_string()));
        }

        if !self.enabled {
            info!("(speech disabled) {}", text);
            return Ok(NarrationOutcome::Spoken);
        }

        self.engine.cancel_all();
        self.engine.speak(text, &self.voice)?;
        debug!("Narrating: {}", preview(text));
        Ok(NarrationOutcome::Spoken)
    }

    /// Flip the mute flag. An utterance already playing keeps playing.
    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
        info!("Narration {}", if muted { "muted" } else { "unmuted" });
    }

    pub fn is_muted(&self) -> bool {
        self.muted.is_muted()
    }

    pub fn is_speaking(&self) -> bool {
        self.engine.is_speaking()
    }

    /// Stop any playback (used at shutdown)
    pub fn silence(&self) {
        self.engine.cancel_all();
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > 50 {
        let head: String = text.chars().take(50).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::RecordingSynthesizer;

    fn service() -> (Arc<RecordingSynthesizer>, NarrationService) {
        let engine = Arc::new(RecordingSynthesizer::new());
        let service =
            NarrationService::new(engine.clone(), &SpeechConfig::default(), MuteFlag::default())
                .unwrap();
        (engine, service)
    }

    #[test]
    fn test_latest_narration_wins() {
        let (engine, service) = service();
        assert_eq!(service.speak("A").unwrap(), NarrationOutcome::Spoken);
        assert_eq!(service.speak("B").unwrap(), NarrationOutcome::Spoken);

        assert_eq!(engine.audible(), vec!["B"]);
        assert_eq!(engine.cancelled(), vec!["A"]);
    }

    #[test]
    fn test_muted_is_noop() {
        let (engine, service) = service();
        service.speak("playing").unwrap();
        service.set_muted(true);

        assert_eq!(service.speak("dropped").unwrap(), NarrationOutcome::Suppressed);
        // Muting does not stop the current utterance
        assert_eq!(engine.audible(), vec!["playing"]);
        assert_eq!(engine.cancel_count(), 1);

        service.set_muted(false);
        service.speak("back").unwrap();
        assert_eq!(engine.audible(), vec!["back"]);
    }

    #[test]
    fn test_empty_text_rejected() {
        let (_, service) = service();
        assert!(matches!(service.speak("   "), Err(SpeechError::Synthesizer(_))));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(80);
        assert_eq!(preview(&long).chars().count(), 53);
        assert_eq!(preview("short"), "short");
    }
}
