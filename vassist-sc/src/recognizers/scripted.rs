//! Recognizer that replays a fixed list of results

use super::{SpeechRecognizer, Transcript};
use crate::error::AudioError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

pub struct ScriptedRecognizer {
    results: VecDeque<Result<String, String>>,
    delay: Duration,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(transcripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            results: transcripts.into_iter().map(|t| Ok(t.into())).collect(),
            delay: Duration::ZERO,
        }
    }

    /// Queue a recognition failure after the current results
    pub fn then_fail(mut self, message: impl Into<String>) -> Self {
        self.results.push_back(Err(message.into()));
        self
    }

    pub fn then_say(mut self, text: impl Into<String>) -> Self {
        self.results.push_back(Ok(text.into()));
        self
    }

    /// Wait this long before each result
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn remaining(&self) -> usize {
        self.results.len()
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(&mut self) -> Result<Transcript, AudioError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.results.pop_front() {
            Some(Ok(text)) => Ok(Transcript::new(text)),
            Some(Err(message)) => Err(AudioError::Recognition(message)),
            // Silence: nobody is talking
            None => std::future::pending().await,
        }
    }
}
