//! Detection overlay drawn on top of the live video frame

use crate::config::VisionConfig;
use image::{Rgba, RgbaImage};
use parking_lot::RwLock;
use vassist_core::Detection;

/// Height of the label plate above each box
pub const LABEL_PLATE_HEIGHT: f32 = 25.0;
/// Horizontal padding added to the measured label width
pub const LABEL_PADDING: f32 = 10.0;
/// Approximate advance of one glyph at the 16px label font
const GLYPH_ADVANCE: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One detection as drawn: outline, label plate and label text
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub outline: Rect,
    pub plate: Rect,
    pub text: String,
    /// Baseline origin for the label text
    pub text_origin: (f32, f32),
}

/// Overlay sized to the video frame it annotates
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub width: u32,
    pub height: u32,
    pub boxes: Vec<OverlayBox>,
    pub color: [u8; 4],
    pub text_color: [u8; 4],
    pub stroke_width: u32,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Rasterize outlines and label plates into a transparent RGBA surface.
    ///
    /// Label text is left to the view layer, which has the fonts; the
    /// text and its origin are carried on each [`OverlayBox`].
    pub fn rasterize(&self) -> RgbaImage {
        let mut surface = RgbaImage::new(self.width, self.height);
        let color = Rgba(self.color);

        for b in &self.boxes {
            fill_rect(&mut surface, &b.plate, color);
            stroke_rect(&mut surface, &b.outline, self.stroke_width, color);
        }

        surface
    }
}

/// Builds overlays from detection lists
pub struct FrameRenderer {
    color: [u8; 4],
    text_color: [u8; 4],
    stroke_width: u32,
}

impl FrameRenderer {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            color: config.overlay_color,
            text_color: config.label_text_color,
            stroke_width: config.stroke_width,
        }
    }

    /// Lay out one box per detection, aligned to a `width` x `height` frame.
    /// Every call starts from a cleared surface.
    pub fn render(&self, detections: &[Detection], width: u32, height: u32) -> Overlay {
        let boxes = detections
            .iter()
            .map(|d| {
                let text = format!("{} {}%", d.label, d.confidence_percent());
                let plate_width = measure_text(&text) + LABEL_PADDING;
                OverlayBox {
                    outline: Rect {
                        x: d.bbox.x,
                        y: d.bbox.y,
                        width: d.bbox.width,
                        height: d.bbox.height,
                    },
                    plate: Rect {
                        x: d.bbox.x,
                        y: d.bbox.y - LABEL_PLATE_HEIGHT,
                        width: plate_width,
                        height: LABEL_PLATE_HEIGHT,
                    },
                    text,
                    text_origin: (d.bbox.x + 5.0, d.bbox.y - 7.0),
                }
            })
            .collect();

        Overlay {
            width,
            height,
            boxes,
            color: self.color,
            text_color: self.text_color,
            stroke_width: self.stroke_width,
        }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(&VisionConfig::default())
    }
}

/// Receives each rendered overlay (the view layer)
pub trait OverlaySink: Send + Sync {
    fn present(&self, overlay: &Overlay);
}

/// Keeps the most recent overlay
#[derive(Default)]
pub struct LatestOverlay {
    latest: RwLock<Option<Overlay>>,
    presented: RwLock<usize>,
}

impl LatestOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Overlay> {
        self.latest.read().clone()
    }

    /// Number of overlays presented so far
    pub fn presented(&self) -> usize {
        *self.presented.read()
    }
}

impl OverlaySink for LatestOverlay {
    fn present(&self, overlay: &Overlay) {
        *self.latest.write() = Some(overlay.clone());
        *self.presented.write() += 1;
    }
}

fn measure_text(text: &str) -> f32 {
    text.chars().count() as f32 * GLYPH_ADVANCE
}

/// Clip a float rect to the surface, returning pixel bounds `[x0, x1) x [y0, y1)`
fn clip(surface: &RgbaImage, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
    let finite = rect.x.is_finite()
        && rect.y.is_finite()
        && rect.width.is_finite()
        && rect.height.is_finite();
    if !finite {
        return None;
    }
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let x0 = rect.x.max(0.0).min(w);
    let y0 = rect.y.max(0.0).min(h);
    let x1 = (rect.x + rect.width).max(0.0).min(w);
    let y1 = (rect.y + rect.height).max(0.0).min(h);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1.ceil() as u32, y1.ceil() as u32))
}

fn fill_rect(surface: &mut RgbaImage, rect: &Rect, color: Rgba<u8>) {
    if let Some((x0, y0, x1, y1)) = clip(surface, rect) {
        for y in y0..y1.min(surface.height()) {
            for x in x0..x1.min(surface.width()) {
                surface.put_pixel(x, y, color);
            }
        }
    }
}

fn stroke_rect(surface: &mut RgbaImage, rect: &Rect, stroke: u32, color: Rgba<u8>) {
    let s = stroke as f32;
    let half = s / 2.0;
    let edges = [
        // top, bottom, left, right (centered on the box edge)
        Rect {
            x: rect.x - half,
            y: rect.y - half,
            width: rect.width + s,
            height: s,
        },
        Rect {
            x: rect.x - half,
            y: rect.y + rect.height - half,
            width: rect.width + s,
            height: s,
        },
        Rect {
            x: rect.x - half,
            y: rect.y - half,
            width: s,
            height: rect.height + s,
        },
        Rect {
            x: rect.x + rect.width - half,
            y: rect.y - half,
            width: s,
            height: rect.height + s,
        },
    ];
    for edge in &edges {
        fill_rect(surface, edge, color);
    }
}
