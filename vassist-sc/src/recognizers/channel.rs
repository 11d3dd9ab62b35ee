//! Recognizer fed with already-recognized text
//!
//! The binary reads typed lines and pushes them here, which lets a terminal
//! stand in for the microphone.

use super::{SpeechRecognizer, Transcript};
use crate::error::AudioError;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub struct ChannelRecognizer {
    rx: mpsc::Receiver<String>,
}

/// Create a recognizer and the sender that feeds it
pub fn transcript_channel(capacity: usize) -> (mpsc::Sender<String>, ChannelRecognizer) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, ChannelRecognizer { rx })
}

#[async_trait]
impl SpeechRecognizer for ChannelRecognizer {
    fn name(&self) -> &str {
        "channel"
    }

    async fn recognize(&mut self) -> Result<Transcript, AudioError> {
        loop {
            let line = self.rx.recv().await.ok_or(AudioError::InputClosed)?;
            let text = line.trim();
            if !text.is_empty() {
                return Ok(Transcript::new(text));
            }
        }
    }
}
