use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gridref::debug::save_grid_image;
use gridref::drawing::{GuideStyle, RenderOptions};
use gridref::surface::{load_font_file, load_system_font, RasterSurface};
use gridref::{parse_hex_color, CanvasConfig, RenderError};
use tracing::*;
use tracing_subscriber::EnvFilter;

/// Renders two grid reference sheets: one with "x,y" coordinate labels at
/// every intersection, one with a marker image at every intersection, both
/// overlaid with guide lines.
#[derive(Parser, Debug)]
#[command(name = "gridref", version)]
struct Args {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Grid cell count along the x axis.
    #[arg(long, default_value_t = 8)]
    grid_x: u32,

    /// Grid cell count along the y axis.
    #[arg(long, default_value_t = 8)]
    grid_y: u32,

    /// Padding of the label sheet, in pixels.
    #[arg(long, default_value_t = 30)]
    label_padding: u32,

    /// Padding of the marker sheet, in pixels.
    #[arg(long, default_value_t = 15)]
    marker_padding: u32,

    /// Background color as a hex literal.
    #[arg(long, default_value = "#FAFAFA")]
    background: String,

    /// Marker image file; a builtin disc is synthesized when omitted.
    #[arg(long)]
    marker: Option<PathBuf>,

    /// Diameter of the synthesized marker, in pixels.
    #[arg(long, default_value_t = 48)]
    marker_size: u32,

    /// Label font file; well-known system fonts are probed when omitted.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output file for the label sheet.
    #[arg(long, default_value = "gridref.png")]
    label_output: PathBuf,

    /// Output file for the marker sheet.
    #[arg(long, default_value = "gridimg.png")]
    marker_output: PathBuf,
}

fn report(layer: &str, path: &Path, result: &Result<(), RenderError>) {
    match result {
        Ok(()) => info!("{layer} sheet written to {}", path.display()),
        Err(err) => error!("{layer} sheet failed: {err}"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let background = parse_hex_color(&args.background)
        .with_context(|| format!("invalid --background {:?}", args.background))?;
    let label_config = CanvasConfig::new(
        args.width,
        args.height,
        args.label_padding,
        args.grid_x,
        args.grid_y,
        background,
    )
    .context("invalid label sheet configuration")?;
    let marker_config = CanvasConfig::new(
        args.width,
        args.height,
        args.marker_padding,
        args.grid_x,
        args.grid_y,
        background,
    )
    .context("invalid marker sheet configuration")?;

    let font = match &args.font {
        Some(path) => Some(
            load_font_file(path)
                .with_context(|| format!("failed to load font {}", path.display()))?,
        ),
        None => match load_system_font() {
            Ok(font) => Some(font),
            Err(err) => {
                warn!("{err}; rendering the label sheet without labels");
                None
            }
        },
    };
    let marker = match &args.marker {
        Some(path) => RasterSurface::load_marker(path)
            .with_context(|| format!("failed to load marker {}", path.display()))?,
        None => RasterSurface::builtin_marker(args.marker_size),
    };

    let label_opts = RenderOptions {
        show_labels: font.is_some(),
        ..Default::default()
    };
    let marker_opts = RenderOptions {
        show_labels: false,
        show_images: true,
        marker: Some(&marker),
        ..Default::default()
    };
    let style = GuideStyle::default();

    // The two sheets are independent renders; one failing must not stop the
    // other, so both always run to completion before errors surface.
    info!("rendering grid reference sheets");
    let (label_result, marker_result) = rayon::join(
        || save_grid_image(&label_config, &label_opts, &style, font, &args.label_output),
        || save_grid_image(&marker_config, &marker_opts, &style, None, &args.marker_output),
    );
    report("label", &args.label_output, &label_result);
    report("marker", &args.marker_output, &marker_result);
    label_result.context("label sheet failed")?;
    marker_result.context("marker sheet failed")?;
    Ok(())
}
