//! Error types for vassist-eye

use thiserror::Error;
use vassist_core::Error as CoreError;

#[derive(Error, Debug)]
pub enum VisionError {
    /// The detection engine has not finished loading (or failed to load)
    #[error("Detection model unavailable")]
    ModelUnavailable,

    /// The detection engine raised while processing a frame
    #[error("Detection failure: {0}")]
    DetectionFailure(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<VisionError> for CoreError {
    fn from(err: VisionError) -> Self {
        CoreError::Pipeline(format!("Vision error: {}", err))
    }
}
