//! Native TTS engine backed by espeak-ng
//!
//! Utterances are played one at a time by a background task, each as its own
//! espeak-ng process. Cancellation bumps a generation counter: the task kills
//! the process for the current utterance and skips queued ones enqueued
//! before the bump.

use crate::config::{SpeechConfig, VoiceConfig};
use crate::engines::SpeechSynthesizer;
use crate::error::SpeechError;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

const ESPEAK: &str = "espeak-ng";

struct Utterance {
    text: String,
    voice: Option<String>,
    generation: u64,
}

#[derive(Clone)]
struct EspeakArgs {
    words_per_minute: u32,
    amplitude: u32,
    pitch: u32,
}

pub struct NativeSynthesizer {
    queue: mpsc::UnboundedSender<Utterance>,
    generation: watch::Sender<u64>,
    speaking: Arc<AtomicBool>,
    available: bool,
}

impl NativeSynthesizer {
    /// Start the playback task. Must be called from within a tokio runtime.
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            SpeechError::Engine("No tokio runtime available for the playback task".to_string())
        })?;

        let available = std::process::Command::new(ESPEAK)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if available {
            info!("Native TTS engine initialized ({})", ESPEAK);
        } else {
            warn!("{} not found, native speech unavailable", ESPEAK);
        }

        let args = EspeakArgs {
            words_per_minute: config.words_per_minute(),
            // espeak amplitude 0-200, 100 is normal
            amplitude: ((config.volume * 100.0).round() as u32).min(200),
            // espeak pitch 0-99, 50 is normal
            pitch: ((config.pitch + 1.0) * 49.5).round().clamp(0.0, 99.0) as u32,
        };

        let (queue, rx) = mpsc::unbounded_channel();
        let (generation, generation_rx) = watch::channel(0u64);
        let speaking = Arc::new(AtomicBool::new(false));

        handle.spawn(playback_loop(rx, generation_rx, speaking.clone(), args));

        Ok(Self {
            queue,
            generation,
            speaking,
            available,
        })
    }
}

impl SpeechSynthesizer for NativeSynthesizer {
    fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError> {
        if !self.available {
            return Err(SpeechError::Engine(format!("{} not available", ESPEAK)));
        }

        // Strip control characters; the text is passed after `--` so it is
        // never parsed as an option.
        let sanitized: String = text.chars().filter(|c| !c.is_control()).collect();
        if sanitized.trim().is_empty() {
            return Err(SpeechError::Synthesizer("Text is empty after sanitization".to_string()));
        }

        let utterance = Utterance {
            text: sanitized,
            voice: voice.name.clone().or_else(|| Some(voice.language.to_lowercase())),
            generation: *self.generation.borrow(),
        };
        self.queue
            .send(utterance)
            .map_err(|_| SpeechError::Engine("Playback task stopped".to_string()))
    }

    fn cancel_all(&self) {
        self.generation.send_modify(|g| *g += 1);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Acquire)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "native"
    }
}

async fn playback_loop(
    mut queue: mpsc::UnboundedReceiver<Utterance>,
    mut generation: watch::Receiver<u64>,
    speaking: Arc<AtomicBool>,
    args: EspeakArgs,
) {
    while let Some(utterance) = queue.recv().await {
        let current = *generation.borrow_and_update();
        if utterance.generation < current {
            debug!("Skipping cancelled utterance");
            continue;
        }

        let mut cmd = Command::new(ESPEAK);
        cmd.arg("-s")
            .arg(args.words_per_minute.to_string())
            .arg("-a")
            .arg(args.amplitude.to_string())
            .arg("-p")
            .arg(args.pitch.to_string());
        if let Some(voice) = &utterance.voice {
            cmd.arg("-v").arg(voice);
        }
        cmd.arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start {}: {}", ESPEAK, e);
                continue;
            }
        };

        speaking.store(true, Ordering::Release);
        tokio::select! {
            status = child.wait() => {
                if let Err(e) = status {
                    warn!("{} exited abnormally: {}", ESPEAK, e);
                }
            }
            _ = cancelled_after(&mut generation, utterance.generation) => {
                debug!("Utterance cancelled mid-playback");
                if let Err(e) = child.kill().await {
                    warn!("Failed to stop {}: {}", ESPEAK, e);
                }
            }
        }
        speaking.store(false, Ordering::Release);
    }
    debug!("Playback task stopped");
}

/// Resolves once the generation moves past `generation`
async fn cancelled_after(rx: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if *rx.borrow_and_update() > generation {
            return;
        }
        if rx.changed().await.is_err() {
            // Synthesizer dropped; let playback finish
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_native_engine_reports_availability() {
        let engine = NativeSynthesizer::new(&SpeechConfig::default()).unwrap();
        assert_eq!(engine.name(), "native");
        if !engine.is_available() {
            let result = engine.speak("hello", &VoiceConfig::default());
            assert!(matches!(result, Err(SpeechError::Engine(_))));
        }
        assert!(!engine.is_speaking() || engine.is_available());
    }

    #[test]
    fn test_native_engine_requires_runtime() {
        let result = NativeSynthesizer::new(&SpeechConfig::default());
        assert!(matches!(result, Err(SpeechError::Engine(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = SpeechConfig {
            volume: 3.0,
            ..SpeechConfig::default()
        };
        assert!(matches!(NativeSynthesizer::new(&config), Err(SpeechError::Config(_))));
    }
}
