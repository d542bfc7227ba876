//! Raster drawing backend over the `image` and `imageproc` crates.
//!
//! The renderers in [`crate::drawing`] only see the [`Surface`] trait, so the
//! placement math stays independent of how (or whether) pixels are produced.
//! [`RasterSurface`] is the real backend: an RGBA buffer behind
//! `imageproc::drawing::Blend`, so low-alpha guide strokes composite over the
//! background instead of overwriting it.

use std::fs;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
    Blend,
};
use imageproc::rect::Rect;
use tracing::*;

use crate::RenderError;

/// Pixel size of rendered coordinate labels.
const LABEL_SCALE: f32 = 14.0;

/// Fill color of the synthesized fallback marker.
const BUILTIN_MARKER_COLOR: Rgba<u8> = Rgba([66, 133, 244, 255]);

/// Font search paths for common Linux layouts.
const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansDisplay-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
];

/// Stroke state consumed by line, rectangle, and text draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub thickness: u32,
    pub color: Rgba<u8>,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            thickness: 1,
            color: Rgba([0, 0, 0, 255]),
        }
    }
}

/// Drawing operations the renderers need from a backend.
///
/// Stroke state is set once and applies to subsequent draws, mirroring a
/// stateful 2D context. Anchors follow the [`crate::Placement`] convention:
/// the fraction of the element's extent that sits before the given point.
pub trait Surface {
    /// Sets the stroke used by subsequent line, rectangle, and text draws.
    fn set_stroke(&mut self, thickness: u32, color: Rgba<u8>);

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    fn draw_rect_outline(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Draws `text` so the `(ax, ay)` fraction of its bounding box lands on
    /// `(x, y)`. Fails when the backend has no font installed.
    fn draw_text_anchored(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        ax: f32,
        ay: f32,
    ) -> Result<(), RenderError>;

    /// Draws `image` so the `(ax, ay)` fraction of it lands on `(x, y)`.
    fn draw_image_anchored(&mut self, image: &RgbaImage, x: i32, y: i32, ax: f32, ay: f32);
}

/// RGBA raster implementing [`Surface`] with alpha-blended strokes.
///
/// # Example
/// ```
/// use gridref::surface::{RasterSurface, Surface};
/// use image::Rgba;
///
/// let mut surface = RasterSurface::new(64, 64);
/// surface.clear(Rgba([250, 250, 250, 255]));
/// surface.set_stroke(1, Rgba([0, 0, 0, 30]));
/// surface.draw_line(8.0, 32.0, 56.0, 32.0);
/// ```
pub struct RasterSurface {
    canvas: Blend<RgbaImage>,
    stroke: Stroke,
    font: Option<FontVec>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Blend(RgbaImage::new(width, height)),
            stroke: Stroke::default(),
            font: None,
        }
    }

    /// Fills the whole raster with `color`, discarding prior content.
    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.canvas.0.pixels_mut() {
            *pixel = color;
        }
    }

    /// Installs the font used by [`Surface::draw_text_anchored`].
    pub fn set_font(&mut self, font: FontVec) {
        self.font = Some(font);
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Loads a marker image from disk as RGBA.
    pub fn load_marker(path: &Path) -> Result<RgbaImage, RenderError> {
        trace!("loading marker image from {}", path.display());
        image::open(path)
            .map(|img| img.to_rgba8())
            .map_err(|source| RenderError::MarkerImage {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Synthesizes a filled-disc marker so demos work without an asset file.
    pub fn builtin_marker(diameter: u32) -> RgbaImage {
        let d = diameter.max(8);
        let mut marker = RgbaImage::new(d, d);
        let center = (d / 2) as i32;
        draw_filled_circle_mut(&mut marker, (center, center), center - 1, BUILTIN_MARKER_COLOR);
        marker
    }

    /// Encodes the raster to `path`; the format follows the file extension.
    pub fn export(&self, path: &Path) -> Result<(), RenderError> {
        self.canvas
            .0
            .save(path)
            .map_err(|source| RenderError::Export {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas.0
    }
}

impl Surface for RasterSurface {
    fn set_stroke(&mut self, thickness: u32, color: Rgba<u8>) {
        self.stroke = Stroke {
            thickness: thickness.max(1),
            color,
        };
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let thickness = self.stroke.thickness as i32;
        let half = thickness / 2;
        for i in 0..thickness {
            let off = (i - half) as f32;
            if (y1 - y2).abs() < f32::EPSILON {
                // Horizontal stroke fattens vertically, everything else
                // horizontally; guide lines are always axis-aligned.
                draw_line_segment_mut(
                    &mut self.canvas,
                    (x1, y1 + off),
                    (x2, y2 + off),
                    self.stroke.color,
                );
            } else {
                draw_line_segment_mut(
                    &mut self.canvas,
                    (x1 + off, y1),
                    (x2 + off, y2),
                    self.stroke.color,
                );
            }
        }
    }

    fn draw_rect_outline(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let thickness = self.stroke.thickness as i32;
        let half = thickness / 2;
        for i in 0..thickness {
            let d = i - half;
            let rect = Rect::at(x as i32 + d, y as i32 + d).of_size(
                (w as i32 - 2 * d).max(1) as u32,
                (h as i32 - 2 * d).max(1) as u32,
            );
            draw_hollow_rect_mut(&mut self.canvas, rect, self.stroke.color);
        }
    }

    fn draw_text_anchored(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        ax: f32,
        ay: f32,
    ) -> Result<(), RenderError> {
        let font = self.font.as_ref().ok_or(RenderError::FontUnavailable)?;
        let scale = PxScale::from(LABEL_SCALE);
        let (text_w, text_h) = text_size(scale, font, text);
        let left = x - (ax * text_w as f32).round() as i32;
        let top = y - (ay * text_h as f32).round() as i32;
        draw_text_mut(&mut self.canvas, self.stroke.color, left, top, scale, font, text);
        Ok(())
    }

    fn draw_image_anchored(&mut self, image: &RgbaImage, x: i32, y: i32, ax: f32, ay: f32) {
        let left = i64::from(x) - i64::from((ax * image.width() as f32).round() as i32);
        let top = i64::from(y) - i64::from((ay * image.height() as f32).round() as i32);
        imageops::overlay(&mut self.canvas.0, image, left, top);
    }
}

/// Probes well-known system font paths for a usable label font.
pub fn load_system_font() -> Result<FontVec, RenderError> {
    for path in FONT_PATHS {
        if let Ok(data) = fs::read(path) {
            debug!("loading label font from {}", path);
            return FontVec::try_from_vec(data)
                .map_err(|err| RenderError::FontParse(err.to_string()));
        }
    }
    Err(RenderError::FontUnavailable)
}

/// Loads a label font from an explicit path.
pub fn load_font_file(path: &Path) -> Result<FontVec, RenderError> {
    let data = fs::read(path).map_err(|source| RenderError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(data).map_err(|err| RenderError::FontParse(err.to_string()))
}
