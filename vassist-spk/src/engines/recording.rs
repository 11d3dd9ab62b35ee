//! In-memory engine that records what would be heard
//!
//! Models the platform speech queue without audio hardware: `speak` appends
//! to the queue, `cancel_all` empties it, and the head of the queue is the
//! utterance currently playing.

use crate::config::VoiceConfig;
use crate::engines::SpeechSynthesizer;
use crate::error::SpeechError;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Default)]
struct RecordingState {
    queue: VecDeque<String>,
    spoken: Vec<String>,
    cancelled: Vec<String>,
    cancel_count: usize,
    fail_next: Option<String>,
}

#[derive(Default)]
pub struct RecordingSynthesizer {
    state: Mutex<RecordingState>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utterances still queued, current one first
    pub fn audible(&self) -> Vec<String> {
        self.state.lock().queue.iter().cloned().collect()
    }

    /// Every utterance ever handed to `speak`, in order
    pub fn spoken(&self) -> Vec<String> {
        self.state.lock().spoken.clone()
    }

    /// Utterances removed by `cancel_all` before they finished
    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().cancelled.clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.state.lock().cancel_count
    }

    /// Finish the utterance at the head of the queue
    pub fn finish_current(&self) -> Option<String> {
        self.state.lock().queue.pop_front()
    }

    /// Make the next `speak` call fail with an engine error
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().fail_next = Some(message.into());
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&self, text: &str, _voice: &VoiceConfig) -> Result<(), SpeechError> {
        let mut state = self.state.lock();
        if let Some(message) = state.fail_next.take() {
            return Err(SpeechError::Engine(message));
        }
        state.queue.push_back(text.to_string());
        state.spoken.push(text.to_string());
        Ok(())
    }

    fn cancel_all(&self) {
        let mut state = self.state.lock();
        let drained: Vec<String> = state.queue.drain(..).collect();
        state.cancelled.extend(drained);
        state.cancel_count += 1;
    }

    fn is_speaking(&self) -> bool {
        !self.state.lock().queue.is_empty()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_without_cancel_plays_in_order() {
        let engine = RecordingSynthesizer::new();
        let voice = VoiceConfig::default();
        engine.speak("one", &voice).unwrap();
        engine.speak("two", &voice).unwrap();

        assert!(engine.is_speaking());
        assert_eq!(engine.finish_current().as_deref(), Some("one"));
        assert_eq!(engine.audible(), vec!["two"]);
    }

    #[test]
    fn test_cancel_all_drops_queue() {
        let engine = RecordingSynthesizer::new();
        let voice = VoiceConfig::default();
        engine.speak("one", &voice).unwrap();
        engine.speak("two", &voice).unwrap();
        engine.cancel_all();

        assert!(!engine.is_speaking());
        assert_eq!(engine.cancelled(), vec!["one", "two"]);
        assert_eq!(engine.spoken().len(), 2);
        assert_eq!(engine.cancel_count(), 1);
    }

    #[test]
    fn test_fail_next() {
        let engine = RecordingSynthesizer::new();
        engine.fail_next("device busy");
        assert!(engine.speak("x", &VoiceConfig::default()).is_err());
        assert!(engine.speak("y", &VoiceConfig::default()).is_ok());
        assert_eq!(engine.spoken(), vec!["y"]);
    }
}
