//! This crate computes pixel placement for labels and images on a uniform grid
//! overlaid on a fixed-size canvas, and renders reference sheets of the result.
//! It uses the `image` and `imageproc` crates for rasterization and `ab_glyph` for fonts.

/// Convenience module composing a full reference render: surface setup,
/// grid references, guide lines, and PNG export in one call.
///
/// # Example
/// ```no_run
/// use gridref::{debug, drawing::*, CanvasConfig};
/// use image::Rgba;
/// use std::path::Path;
///
/// let config = CanvasConfig::new(1024, 1024, 30, 8, 8, Rgba([250, 250, 250, 255])).unwrap();
/// let marker = gridref::surface::RasterSurface::builtin_marker(48);
/// let opts = RenderOptions {
///     show_labels: false,
///     show_images: true,
///     marker: Some(&marker),
///     ..Default::default()
/// };
///
/// debug::save_grid_image(&config, &opts, &GuideStyle::default(), None, Path::new("gridimg.png"))
///     .unwrap();
/// ```
pub mod debug;
/// This module provides the renderers that walk the grid: [`render_grid_refs`]
/// places anchored labels and marker images at every intersection, and
/// [`draw_guides`] draws the lattice, center cross, and padding rectangle.
///
/// [`render_grid_refs`]: drawing::render_grid_refs
/// [`draw_guides`]: drawing::draw_guides
pub mod drawing;
/// The drawing backend seam: the [`Surface`] trait consumed by the renderers
/// and [`RasterSurface`], its `image`/`imageproc` implementation.
///
/// [`Surface`]: surface::Surface
/// [`RasterSurface`]: surface::RasterSurface
pub mod surface;

use std::io;
use std::path::PathBuf;

use image::Rgba;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::*;

const DEFAULT_SMALLVEC_SIZE: usize = 32;

/// Anchor value aligning an element's leading edge to the computed position.
pub const ANCHOR_START: f32 = 0.0;
/// Anchor value centering an element on the computed position.
pub const ANCHOR_CENTER: f32 = 0.5;
/// Anchor value aligning an element's trailing edge to the computed position.
pub const ANCHOR_END: f32 = 1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("canvas has no drawable area: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("grid needs at least one cell per axis: grid_x={grid_x}, grid_y={grid_y}")]
    EmptyGrid { grid_x: u32, grid_y: u32 },

    #[error("padding {padding} leaves no cells on a {width}x{height} canvas")]
    PaddingTooLarge {
        padding: u32,
        width: u32,
        height: u32,
    },

    #[error("unrecognized color literal: {0:?}")]
    InvalidColor(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no usable label font was found")]
    FontUnavailable,

    #[error("failed to read font file {path}: {source}")]
    FontRead { path: PathBuf, source: io::Error },

    #[error("failed to parse font data: {0}")]
    FontParse(String),

    #[error("marker rendering requested without a marker image")]
    MissingMarker,

    #[error("failed to load marker image {path}: {source}")]
    MarkerImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to export raster to {path}: {source}")]
    Export {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A type alias for SmallVec sized so typical grids stay on the stack.
pub type OffsetVec = SmallVec<[f64; DEFAULT_SMALLVEC_SIZE]>;

/// Pixel position plus anchor pair for one grid intersection.
///
/// The anchors describe which part of a drawn element aligns to `(px, py)`:
/// `0.0` puts the element's leading edge at the point, `0.5` centers it,
/// `1.0` puts the trailing edge there.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement {
    pub px: i32,
    pub py: i32,
    pub ax: f32,
    pub ay: f32,
}

/// Canvas geometry plus grid dimensions, with the per-cell metrics derived
/// once at construction. Values are immutable afterwards, so placement can
/// never observe a half-updated configuration.
///
/// Grid coordinates address line *intersections*, not cells: an 8x8 grid has
/// 9x9 addressable points, with `(0, 0)` at the lower left and y growing
/// upward.
///
/// # Example
/// ```
/// use gridref::CanvasConfig;
/// use image::Rgba;
///
/// let config = CanvasConfig::new(1024, 1024, 30, 8, 8, Rgba([250, 250, 250, 255])).unwrap();
/// assert_eq!(config.cell_width(), 120.5);
/// assert_eq!(config.cell_height(), 120.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    width: u32,
    height: u32,
    padding: u32,
    grid_x: u32,
    grid_y: u32,
    background: Rgba<u8>,
    cell_width: f64,
    cell_height: f64,
    origin_x: f64,
    origin_y: f64,
}

impl CanvasConfig {
    /// Creates a validated `CanvasConfig` and derives the cell metrics.
    ///
    /// `padding` must stay under half the smaller canvas axis and both grid
    /// counts must be at least 1, otherwise every cell would collapse to
    /// nothing and the edge classification below would become ambiguous.
    ///
    /// # Example
    /// ```
    /// use gridref::{CanvasConfig, ConfigError};
    /// use image::Rgba;
    ///
    /// let white = Rgba([255, 255, 255, 255]);
    /// assert!(CanvasConfig::new(256, 256, 16, 4, 4, white).is_ok());
    /// assert_eq!(
    ///     CanvasConfig::new(256, 256, 16, 0, 4, white),
    ///     Err(ConfigError::EmptyGrid { grid_x: 0, grid_y: 4 })
    /// );
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        padding: u32,
        grid_x: u32,
        grid_y: u32,
        background: Rgba<u8>,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            error!("invalid canvas dimensions: width={}, height={}", width, height);
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        if grid_x == 0 || grid_y == 0 {
            error!("invalid grid dimensions: grid_x={}, grid_y={}", grid_x, grid_y);
            return Err(ConfigError::EmptyGrid { grid_x, grid_y });
        }
        if u64::from(padding) * 2 >= u64::from(width.min(height)) {
            error!("padding {} swallows the {}x{} canvas", padding, width, height);
            return Err(ConfigError::PaddingTooLarge {
                padding,
                width,
                height,
            });
        }

        let w = f64::from(width);
        let h = f64::from(height);
        let p = f64::from(padding);
        let cell_width = (w - p - p) / f64::from(grid_x);
        let cell_height = (h - p - p) / f64::from(grid_y);
        let origin_x = w / 2.0 - cell_width * (f64::from(grid_x) / 2.0);
        let origin_y = h / 2.0 + cell_height * (f64::from(grid_y) / 2.0);
        debug!(
            "derived cell metrics: cell_width={}, cell_height={}, origin=({}, {})",
            cell_width, cell_height, origin_x, origin_y
        );

        Ok(Self {
            width,
            height,
            padding,
            grid_x,
            grid_y,
            background,
            cell_width,
            cell_height,
            origin_x,
            origin_y,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn grid_x(&self) -> u32 {
        self.grid_x
    }

    pub fn grid_y(&self) -> u32 {
        self.grid_y
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    /// Pixel spacing between adjacent vertical grid lines.
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Pixel spacing between adjacent horizontal grid lines.
    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Maps a grid coordinate to a pixel position and anchor pair.
    ///
    /// Coordinates beyond the grid are clamped to the nearest boundary rather
    /// than rejected. Edge coordinates anchor the element inward (`0.0`/`1.0`)
    /// so it stays inside the padded area; interior coordinates center it.
    /// The vertical axis is inverted: `y = 0` maps near the canvas bottom and
    /// larger `y` moves upward.
    ///
    /// Pure function of `(self, x, y)`: no hidden state, identical inputs
    /// always produce identical output.
    ///
    /// # Example
    /// ```
    /// use gridref::CanvasConfig;
    /// use image::Rgba;
    ///
    /// let config = CanvasConfig::new(1024, 1024, 30, 8, 8, Rgba([250, 250, 250, 255])).unwrap();
    ///
    /// let lower_left = config.place(0, 0);
    /// assert_eq!((lower_left.px, lower_left.py), (30, 994));
    /// assert_eq!((lower_left.ax, lower_left.ay), (0.0, 1.0));
    ///
    /// let center = config.place(4, 4);
    /// assert_eq!((center.ax, center.ay), (0.5, 0.5));
    /// ```
    pub fn place(&self, x: u32, y: u32) -> Placement {
        let x = x.min(self.grid_x);
        let y = y.min(self.grid_y);
        trace!("placing grid coordinate ({}, {})", x, y);

        let (px, ax) = if x > 0 && x < self.grid_x {
            (self.origin_x + self.cell_width * f64::from(x), ANCHOR_CENTER)
        } else if x == self.grid_x {
            // Checked before x == 0: on a degenerate zero-cell axis both edge
            // classifications match and the trailing edge wins the tie.
            // new() rejects grid_x == 0, so the overlap stays unreachable
            // through the public API.
            (
                self.origin_x + self.cell_width * f64::from(self.grid_x),
                ANCHOR_END,
            )
        } else {
            (self.origin_x, ANCHOR_START)
        };

        let (py, ay) = if y > 0 && y < self.grid_y {
            (
                self.origin_y - self.cell_height * f64::from(y),
                ANCHOR_CENTER,
            )
        } else if y == self.grid_y {
            (
                self.origin_y - self.cell_height * f64::from(self.grid_y),
                ANCHOR_START,
            )
        } else {
            (self.origin_y, ANCHOR_END)
        };

        Placement {
            px: px as i32,
            py: py as i32,
            ax,
            ay,
        }
    }

    /// Returns every grid coordinate exactly once, row by row from the
    /// bottom.
    ///
    /// # Example
    /// ```
    /// use gridref::CanvasConfig;
    /// use image::Rgba;
    ///
    /// let config = CanvasConfig::new(256, 256, 16, 2, 2, Rgba([255, 255, 255, 255])).unwrap();
    /// assert_eq!(config.coordinates().count(), 9);
    /// ```
    pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> {
        let (grid_x, grid_y) = (self.grid_x, self.grid_y);
        (0..=grid_y).flat_map(move |y| (0..=grid_x).map(move |x| (x, y)))
    }

    /// Pixel x offset of each vertical grid line, leftmost first.
    ///
    /// These are the same offsets [`place`](Self::place) produces, so guide
    /// lines drawn from them land exactly on the placement positions.
    pub fn column_offsets(&self) -> OffsetVec {
        (0..=self.grid_x)
            .map(|i| self.origin_x + self.cell_width * f64::from(i))
            .collect()
    }

    /// Pixel y offset of each horizontal grid line, bottommost first.
    pub fn row_offsets(&self) -> OffsetVec {
        (0..=self.grid_y)
            .map(|j| self.origin_y - self.cell_height * f64::from(j))
            .collect()
    }
}

/// Parses a `#RGB`, `#RRGGBB`, or `#RRGGBBAA` color literal, with or without
/// the leading `#`. Three- and six-digit forms get an opaque alpha.
///
/// # Example
/// ```
/// use gridref::parse_hex_color;
/// use image::Rgba;
///
/// assert_eq!(parse_hex_color("#FAFAFA").unwrap(), Rgba([250, 250, 250, 255]));
/// assert_eq!(parse_hex_color("#1234"), Err(gridref::ConfigError::InvalidColor("#1234".into())));
/// ```
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, ConfigError> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    let invalid = || ConfigError::InvalidColor(value.to_owned());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    match digits.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (slot, ch) in channels.iter_mut().zip(digits.chars()) {
                let nibble = ch.to_digit(16).ok_or_else(invalid)? as u8;
                *slot = nibble << 4 | nibble;
            }
            Ok(Rgba([channels[0], channels[1], channels[2], 255]))
        }
        6 | 8 => {
            let mut channels = [0, 0, 0, 255u8];
            for (i, slot) in channels.iter_mut().take(digits.len() / 2).enumerate() {
                *slot = u8::from_str_radix(&digits[2 * i..2 * i + 2], 16)
                    .map_err(|_| invalid())?;
            }
            Ok(Rgba(channels))
        }
        _ => Err(invalid()),
    }
}
