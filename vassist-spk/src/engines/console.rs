//! Engine that prints utterances instead of playing them

use crate::config::VoiceConfig;
use crate::engines::SpeechSynthesizer;
use crate::error::SpeechError;
use parking_lot::Mutex;
use std::io::Write;
use tracing::debug;

pub struct ConsoleSynthesizer {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSynthesizer {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl Default for ConsoleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&self, text: &str, _voice: &VoiceConfig) -> Result<(), SpeechError> {
        let mut out = self.out.lock();
        writeln!(out, "🔊 {}", text)?;
        out.flush()?;
        Ok(())
    }

    fn cancel_all(&self) {
        debug!("Console synthesizer has nothing to cancel");
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "console"
    }
}
