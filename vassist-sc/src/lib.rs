//! vassist-sc: voice input for Vision Assist
//!
//! Recognized speech arrives through the [`SpeechRecognizer`] contract.
//! [`VoiceListener`] runs a listening session and forwards each finalized
//! transcript; [`VoiceCommandDispatcher`] maps camera-tab transcripts to
//! detection commands and [`DialogueResponder`] answers chat-tab ones.

pub mod error;
pub mod config;
pub mod recognizers;
pub mod listener;
pub mod commands;
pub mod dialogue;

pub use error::AudioError;
pub use config::ListenConfig;
pub use recognizers::{
    transcript_channel, ChannelRecognizer, ScriptedRecognizer, SpeechRecognizer, Transcript,
};
pub use listener::{ListenerEvent, VoiceListener};
pub use commands::{VoiceCommand, VoiceCommandDispatcher};
pub use dialogue::DialogueResponder;
