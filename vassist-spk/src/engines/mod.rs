//! TTS engine implementations

pub mod console;
pub mod native;
pub mod recording;

use crate::config::VoiceConfig;
use crate::error::SpeechError;

pub use console::ConsoleSynthesizer;
pub use native::NativeSynthesizer;
pub use recording::RecordingSynthesizer;

/// Contract for a platform text-to-speech engine.
///
/// `speak` enqueues an utterance and returns without waiting for playback.
/// `cancel_all` stops the current utterance and drops everything queued.
pub trait SpeechSynthesizer: Send + Sync {
    /// Enqueue text for playback
    fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError>;

    /// Stop current playback and discard queued utterances
    fn cancel_all(&self);

    /// True while an utterance is playing
    fn is_speaking(&self) -> bool;

    /// Check if engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}
