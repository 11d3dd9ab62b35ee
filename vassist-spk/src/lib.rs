//! vassist-spk: spoken narration for Vision Assist
//!
//! Provides text-to-speech with:
//! - A narrow [`SpeechSynthesizer`] contract over the platform engine
//! - espeak-ng, console and in-memory engines
//! - [`NarrationService`], which keeps only the latest narration audible
//!   and honors the shared mute flag

pub mod error;
pub mod config;
pub mod engines;
pub mod narrator;

pub use error::SpeechError;
pub use config::{SpeechConfig, TtsEngine, VoiceConfig};
pub use engines::{ConsoleSynthesizer, NativeSynthesizer, RecordingSynthesizer, SpeechSynthesizer};
pub use narrator::{NarrationOutcome, NarrationService};
