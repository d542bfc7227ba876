//! This module provides the renderers for grid reference sheets: anchored
//! labels and marker images at every intersection, plus the guide lattice.
//! It drives any [`Surface`] backend and requires the `image` crate for
//! color and raster types.
//!
//! # Examples
//!
//! ```rust
//! use gridref::{drawing::*, CanvasConfig};
//! use gridref::surface::RasterSurface;
//! use image::Rgba;
//!
//! let config = CanvasConfig::new(256, 256, 16, 4, 4, Rgba([250, 250, 250, 255])).unwrap();
//! let mut surface = RasterSurface::new(config.width(), config.height());
//! surface.clear(config.background());
//!
//! // Place a marker at every intersection, then the guides on top.
//! let marker = RasterSurface::builtin_marker(16);
//! let opts = RenderOptions {
//!     show_labels: false,
//!     show_images: true,
//!     marker: Some(&marker),
//!     ..Default::default()
//! };
//! render_grid_refs(&config, &mut surface, &opts).unwrap();
//! draw_guides(&config, &mut surface, &GuideStyle::default());
//! ```

use image::{Rgba, RgbaImage};
use tracing::*;

use crate::surface::Surface;
use crate::{CanvasConfig, RenderError};

/// Vertical lift in pixels applied to labels so they sit above the
/// intersection point instead of covering it.
pub const LABEL_LIFT: i32 = 5;

/// What [`render_grid_refs`] draws at each intersection.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Draw the literal "x,y" coordinate label.
    pub show_labels: bool,
    /// Draw `marker` anchored at the intersection.
    pub show_images: bool,
    /// Marker image; required when `show_images` is set.
    pub marker: Option<&'a RgbaImage>,
    /// Stroke color used for labels.
    pub label_color: Rgba<u8>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        RenderOptions {
            show_labels: true,
            show_images: false,
            marker: None,
            label_color: Rgba([0, 0, 0, 255]),
        }
    }
}

/// Styling for [`draw_guides`]: a faint lattice with an emphasized center
/// cross and padding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideStyle {
    pub lattice_color: Rgba<u8>,
    pub lattice_thickness: u32,
    pub accent_color: Rgba<u8>,
    pub accent_thickness: u32,
}

impl Default for GuideStyle {
    fn default() -> Self {
        GuideStyle {
            lattice_color: Rgba([0, 0, 0, 30]),
            lattice_thickness: 1,
            accent_color: Rgba([230, 0, 0, 30]),
            accent_thickness: 3,
        }
    }
}

/// Draws labels and/or marker images at every grid intersection.
///
/// Visits each of the `(grid_x + 1) * (grid_y + 1)` intersections exactly
/// once. Placements are independent, so the visiting order has no observable
/// effect on the raster.
///
/// # Errors
/// [`RenderError::MissingMarker`] when `show_images` is set without a marker;
/// font errors propagate from the surface when labels are requested.
pub fn render_grid_refs<S: Surface>(
    config: &CanvasConfig,
    surface: &mut S,
    opts: &RenderOptions<'_>,
) -> Result<(), RenderError> {
    if opts.show_images && opts.marker.is_none() {
        return Err(RenderError::MissingMarker);
    }
    debug!(
        "rendering grid references: labels={}, images={}",
        opts.show_labels, opts.show_images
    );

    if opts.show_labels {
        surface.set_stroke(1, opts.label_color);
    }
    for (x, y) in config.coordinates() {
        let placement = config.place(x, y);
        if opts.show_images {
            if let Some(marker) = opts.marker {
                surface.draw_image_anchored(
                    marker,
                    placement.px,
                    placement.py,
                    placement.ax,
                    placement.ay,
                );
            }
        }
        if opts.show_labels {
            surface.draw_text_anchored(
                &format!("{x},{y}"),
                placement.px,
                placement.py - LABEL_LIFT,
                placement.ax,
                placement.ay,
            )?;
        }
    }
    Ok(())
}

/// Draws the guide lattice, center cross, and padding rectangle.
///
/// Lattice lines sit at the exact row and column offsets the placement math
/// uses, so markers rendered by [`render_grid_refs`] land on the
/// intersections. The accent strokes come last and layer on top.
pub fn draw_guides<S: Surface>(config: &CanvasConfig, surface: &mut S, style: &GuideStyle) {
    let left = config.padding() as f32;
    let top = config.padding() as f32;
    let right = (config.width() - config.padding()) as f32;
    let bottom = (config.height() - config.padding()) as f32;

    surface.set_stroke(style.lattice_thickness, style.lattice_color);
    for y in config.row_offsets() {
        trace!("horizontal guide line at y={}", y);
        surface.draw_line(left, y as f32, right, y as f32);
    }
    for x in config.column_offsets() {
        trace!("vertical guide line at x={}", x);
        surface.draw_line(x as f32, top, x as f32, bottom);
    }

    let center_x = config.width() as f32 / 2.0;
    let center_y = config.height() as f32 / 2.0;
    surface.set_stroke(style.accent_thickness, style.accent_color);
    surface.draw_line(center_x, top, center_x, bottom);
    surface.draw_line(left, center_y, right, center_y);
    surface.draw_rect_outline(left, top, right - left, bottom - top);
}
