//! Error types for vassist-sc

use thiserror::Error;
use vassist_core::Error as CoreError;

/// Voice input errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Voice input closed")]
    InputClosed,

    #[error("A listening session is already running")]
    AlreadyListening,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<AudioError> for CoreError {
    fn from(err: AudioError) -> Self {
        CoreError::Pipeline(format!("Audio error: {}", err))
    }
}
