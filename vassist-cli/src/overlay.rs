//! Overlay sink that writes each overlay to a PNG file

use std::path::PathBuf;
use tracing::{debug, warn};
use vassist_eye::{Overlay, OverlaySink};

pub struct PngOverlayWriter {
    path: PathBuf,
}

impl PngOverlayWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OverlaySink for PngOverlayWriter {
    fn present(&self, overlay: &Overlay) {
        match overlay.rasterize().save(&self.path) {
            Ok(()) => debug!(
                "Overlay with {} boxes written to {}",
                overlay.boxes.len(),
                self.path.display()
            ),
            Err(e) => warn!("Could not write overlay to {}: {}", self.path.display(), e),
        }
    }
}
