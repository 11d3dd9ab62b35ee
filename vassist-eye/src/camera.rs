//! Frame sources for the live view

use crate::error::VisionError;
use bytes::Bytes;
use parking_lot::RwLock;
use std::path::Path;
use tracing::info;
use vassist_core::Frame;

/// Anything that can hand out the current video frame
pub trait FrameSource: Send + Sync {
    /// Current frame, or `VisionError::Camera` when no frame is available yet
    fn capture_frame(&self) -> Result<Frame, VisionError>;
}

/// Latest-frame slot fed by a capture loop
#[derive(Default)]
pub struct FrameSlot {
    latest: RwLock<Option<Frame>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame(frame: Frame) -> Self {
        Self {
            latest: RwLock::new(Some(frame)),
        }
    }

    /// Replace the current frame
    pub fn publish(&self, frame: Frame) {
        *self.latest.write() = Some(frame);
    }

    pub fn clear(&self) {
        *self.latest.write() = None;
    }
}

impl FrameSource for FrameSlot {
    fn capture_frame(&self) -> Result<Frame, VisionError> {
        self.latest
            .read()
            .clone()
            .ok_or_else(|| VisionError::Camera("No frame available".to_string()))
    }
}

/// A still image served as every frame
pub struct StillImageSource {
    frame: Frame,
}

impl StillImageSource {
    pub fn open(path: &Path) -> Result<Self, VisionError> {
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        info!("Using still image {} ({}x{}) as camera", path.display(), width, height);
        Ok(Self {
            frame: Frame::new(width, height, Bytes::from(image.into_raw())),
        })
    }

    /// Blank frame of the given size, for running without a camera
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            frame: Frame::blank(width, height),
        }
    }
}

impl FrameSource for StillImageSource {
    fn capture_frame(&self) -> Result<Frame, VisionError> {
        Ok(self.frame.clone())
    }
}
