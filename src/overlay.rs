//! Caption overlay and persistence.
//!
//! The caption color is the single most frequent pixel color of the whole
//! image. That is a deliberate low-cost heuristic: when the caption lands on
//! a region of exactly that color the text is invisible. Likewise a caption
//! wider than the image clips at the left edge rather than being repositioned.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use tracing::{info, warn};

use crate::constants::CAPTION_MARGIN;
use crate::error::AqiscapeError;

/// How the caption gets drawn.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// TrueType font file to render with.
    pub font_path: PathBuf,
    /// Font size in pixels.
    pub font_size: f32,
    /// Custom caption overriding the default `{name} // {aqi}`.
    pub custom_text: Option<String>,
}

/// Decodes `image_bytes`, draws the caption 50px in from the top-right
/// corner, and writes the result to `{output_dir}/{name}_{aqi}.png`
/// (`{name}.png` when no AQI is present) via a temp file and copy.
///
/// Returns the destination path.
pub fn finalize(
    image_bytes: &[u8],
    name: &str,
    aqi: Option<i64>,
    style: &OverlayStyle,
    output_dir: &Path,
) -> Result<PathBuf, AqiscapeError> {
    let decoded = image::load_from_memory(image_bytes).map_err(|err| {
        AqiscapeError::Download(format!("generated image could not be decoded: {err}"))
    })?;
    let mut canvas = decoded.to_rgba8();

    info!("Adding text overlay to image");
    let caption = caption_text(name, aqi, style.custom_text.as_deref());
    let color = dominant_color(&canvas);
    let font = load_font(&style.font_path)?;
    let scale = Scale::uniform(style.font_size);

    let x = canvas.width() as f32 - caption_width(&font, scale, &caption) - CAPTION_MARGIN as f32;
    if x < 0.0 {
        warn!("Caption is wider than the image and will clip at the left edge");
    }
    draw_caption(
        &mut canvas,
        &font,
        scale,
        (x.round() as i32, CAPTION_MARGIN as i32),
        color,
        &caption,
    );

    persist(&canvas, &output_stem(name, aqi), output_dir)
}

/// The caption string: custom text when supplied, otherwise
/// `{name} // {aqi}`, or just the name when no AQI was fetched.
fn caption_text(name: &str, aqi: Option<i64>, custom_text: Option<&str>) -> String {
    if let Some(text) = custom_text {
        return text.to_string();
    }
    match aqi {
        Some(aqi) => format!("{name} // {aqi}"),
        None => name.to_string(),
    }
}

/// Output filename stem; the AQI-less variant drops the suffix entirely.
fn output_stem(name: &str, aqi: Option<i64>) -> String {
    match aqi {
        Some(aqi) => format!("{name}_{aqi}"),
        None => name.to_string(),
    }
}

/// The single most frequent pixel color across the whole image. Ties are
/// broken arbitrarily.
fn dominant_color(image: &RgbaImage) -> Rgba<u8> {
    let mut counts: HashMap<[u8; 4], u32> = HashMap::new();
    for pixel in image.pixels() {
        *counts.entry(pixel.0).or_insert(0) += 1;
    }
    let best = counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(color, _)| color)
        .unwrap_or([0, 0, 0, 255]);
    Rgba(best)
}

fn load_font(path: &Path) -> Result<Font<'static>, AqiscapeError> {
    let data = fs::read(path)?;
    Font::try_from_vec(data).ok_or_else(|| {
        AqiscapeError::Io(std::io::Error::other(format!(
            "`{}` is not a usable TrueType font",
            path.display()
        )))
    })
}

/// Rendered width of `text` in pixels at the given scale.
fn caption_width(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent))
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .map(|bb| bb.max.x as f32)
        .fold(0.0, f32::max)
}

/// Alpha-blends the caption onto the canvas with `(x, y)` as its top-left
/// corner, skipping any pixels that fall outside the canvas.
fn draw_caption(
    canvas: &mut RgbaImage,
    font: &Font<'_>,
    scale: Scale,
    (x, y): (i32, i32),
    color: Rgba<u8>,
    text: &str,
) {
    let v_metrics = font.v_metrics(scale);
    let baseline = y as f32 + v_metrics.ascent;

    for glyph in font.layout(text, scale, point(x as f32, baseline)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= canvas.width() || py >= canvas.height() {
                return;
            }
            let alpha = coverage.clamp(0.0, 1.0);
            if alpha == 0.0 {
                return;
            }
            let inverse = 1.0 - alpha;
            let pixel = canvas.get_pixel_mut(px, py);
            for channel in 0..3 {
                pixel.0[channel] = (color.0[channel] as f32 * alpha
                    + pixel.0[channel] as f32 * inverse) as u8;
            }
            pixel.0[3] = 255;
        });
    }
}

/// Saves the composited image to the system temp dir, then copies it to the
/// destination. A failed copy removes the orphaned temp file before
/// reporting the error.
fn persist(
    canvas: &RgbaImage,
    stem: &str,
    output_dir: &Path,
) -> Result<PathBuf, AqiscapeError> {
    let filename = format!("{stem}.png");

    let temp_path = std::env::temp_dir().join(&filename);
    canvas.save(&temp_path).map_err(image_io_error)?;
    info!("Image saved to temporary path: {}", temp_path.display());

    let destination = output_dir.join(&filename);
    if let Err(err) = fs::copy(&temp_path, &destination) {
        let _ = fs::remove_file(&temp_path);
        return Err(AqiscapeError::Io(err));
    }
    info!("Image copied to {}", destination.display());

    Ok(destination)
}

fn image_io_error(err: image::ImageError) -> AqiscapeError {
    match err {
        image::ImageError::IoError(io_err) => AqiscapeError::Io(io_err),
        other => AqiscapeError::Io(std::io::Error::other(other.to_string())),
    }
}
