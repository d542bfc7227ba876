use std::path::Path;

use ab_glyph::FontVec;
use tracing::*;

use crate::drawing::{draw_guides, render_grid_refs, GuideStyle, RenderOptions};
use crate::surface::RasterSurface;
use crate::{CanvasConfig, RenderError};

/// Renders one complete reference sheet and saves it as an image file.
///
/// Builds a [`RasterSurface`] sized to the config, clears it to the
/// background color, draws the grid references, layers the guides on top,
/// and exports to `output_path`.
///
/// # Errors
/// Returns [`RenderError`] if reference rendering or the export fails.
///
/// # Examples
///
/// ```no_run
/// use gridref::{debug::save_grid_image, drawing::*, CanvasConfig};
/// use gridref::surface::load_system_font;
/// use image::Rgba;
/// use std::path::Path;
///
/// let config = CanvasConfig::new(1024, 1024, 30, 8, 8, Rgba([250, 250, 250, 255])).unwrap();
/// let font = load_system_font().unwrap();
///
/// save_grid_image(
///     &config,
///     &RenderOptions::default(),
///     &GuideStyle::default(),
///     Some(font),
///     Path::new("gridref.png"),
/// )
/// .unwrap();
/// ```
pub fn save_grid_image(
    config: &CanvasConfig,
    opts: &RenderOptions<'_>,
    style: &GuideStyle,
    font: Option<FontVec>,
    output_path: &Path,
) -> Result<(), RenderError> {
    let mut surface = RasterSurface::new(config.width(), config.height());
    surface.clear(config.background());
    if let Some(font) = font {
        surface.set_font(font);
    }
    render_grid_refs(config, &mut surface, opts)?;
    draw_guides(config, &mut surface, style);
    info!(
        "exporting {}x{} raster to {}",
        config.width(),
        config.height(),
        output_path.display()
    );
    surface.export(output_path)
}
