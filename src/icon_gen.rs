use crate::config::Config;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, DynamicImage, ImageEncoder, ImageFormat,
};
use resvg::{tiny_skia, usvg};
use std::{
    fs::{self, create_dir_all},
    path::Path,
    sync::Arc,
};

/// Render the configured SVG once per size, in order.
///
/// The source is parsed before any output is touched, so a missing or
/// malformed SVG leaves existing PNGs as they were. A notice is printed
/// only after a size has been both rendered and optimized.
pub fn generate(config: &Config) -> Result<()> {
    config.validate()?;

    if config.sizes.is_empty() {
        log::debug!("No sizes requested, nothing to do");
        return Ok(());
    }

    let tree = load_svg(&config.source_path)?;

    create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Can't create output directory {}",
            config.output_dir.display()
        )
    })?;

    for &size in &config.sizes {
        let output_path = config.output_path(size);
        render_png(&tree, size, &output_path)?;
        if config.optimize {
            optimize_png(&output_path)?;
        }
        println!("Generated icon {size}x{size}");
    }

    Ok(())
}

pub fn load_svg(path: &Path) -> Result<usvg::Tree> {
    let svg_data =
        fs::read(path).with_context(|| format!("Failed to read SVG {}", path.display()))?;

    // Relative <image> hrefs resolve against the SVG's own directory.
    let mut opt = usvg::Options {
        resources_dir: fs::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf)),
        ..usvg::Options::default()
    };
    Arc::make_mut(&mut opt.fontdb).load_system_fonts();

    let tree = usvg::Tree::from_data(&svg_data, &opt)
        .with_context(|| format!("Failed to parse SVG {}", path.display()))?;

    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        tree.size().width(),
        tree.size().height()
    );
    Ok(tree)
}

/// Rasterize `tree` into a `size`×`size` PNG at `path`.
///
/// The viewport keeps its aspect ratio and is centred, leaving transparent
/// bands on the short axis of a non-square source.
pub fn render_png(tree: &usvg::Tree, size: u32, path: &Path) -> Result<()> {
    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate {size}x{size} pixmap"))?;

    let transform = fit_transform(tree.size(), size);
    log::debug!("Rendering {size}x{size} with {transform:?}");

    resvg::render(tree, transform, &mut pixmap.as_mut());

    let png_data = pixmap
        .encode_png()
        .with_context(|| format!("Failed to encode {size}x{size} PNG"))?;
    fs::write(path, png_data)
        .with_context(|| format!("Failed to write PNG file {}", path.display()))?;
    Ok(())
}

// xMidYMid meet into a size×size square.
fn fit_transform(svg_size: usvg::Size, size: u32) -> tiny_skia::Transform {
    let (width, height) = (svg_size.width(), svg_size.height());
    let side = size as f32;
    let scale = (side / width).min(side / height);
    let dx = (side - width * scale) / 2.0;
    let dy = (side - height * scale) / 2.0;
    tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy)
}

/// Re-open the PNG at `path` and re-save it through the best-compression
/// encoder. The file is only replaced when the new encoding is smaller.
pub fn optimize_png(path: &Path) -> Result<()> {
    let original = fs::read(path)
        .with_context(|| format!("Failed to re-open PNG file {}", path.display()))?;
    let image = image::load_from_memory_with_format(&original, ImageFormat::Png)
        .with_context(|| format!("Failed to decode PNG file {}", path.display()))?;

    let optimized = encode_optimized(&image)?;
    log::debug!(
        "{}: {} bytes rendered, {} bytes optimized",
        path.display(),
        original.len(),
        optimized.len()
    );

    if optimized.len() < original.len() {
        fs::write(path, optimized)
            .with_context(|| format!("Failed to write PNG file {}", path.display()))?;
    }
    Ok(())
}

// Lossless: alpha is only dropped when every pixel is fully opaque.
fn encode_optimized(image: &DynamicImage) -> Result<Vec<u8>> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let (data, color) = if rgba.pixels().all(|p| p[3] == u8::MAX) {
        (image.to_rgb8().into_raw(), ColorType::Rgb8)
    } else {
        (rgba.into_raw(), ColorType::Rgba8)
    };

    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(&data, width, height, color)
        .context("Failed to encode optimized PNG")?;
    Ok(buf)
}
