//! Speech-to-text recognizers

pub mod channel;
pub mod scripted;

use crate::error::AudioError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use channel::{transcript_channel, ChannelRecognizer};
pub use scripted::ScriptedRecognizer;

/// One finalized user utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}

/// Contract for a speech-to-text engine.
///
/// Each call to `recognize` waits for the next finalized utterance.
/// Implementations must be cancel-safe: a listening session drops the
/// pending call when it is stopped.
#[async_trait]
pub trait SpeechRecognizer: Send {
    fn name(&self) -> &str;

    async fn recognize(&mut self) -> Result<Transcript, AudioError>;
}
