//! Error types for vassist-pipeline

use thiserror::Error;
use vassist_core::Error as CoreError;
use vassist_eye::VisionError;
use vassist_sc::AudioError;
use vassist_spk::SpeechError;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The runtime has stopped and no longer accepts events
    #[error("Pipeline event queue closed")]
    Closed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<PipelineError> for CoreError {
    fn from(err: PipelineError) -> Self {
        CoreError::Pipeline(err.to_string())
    }
}
