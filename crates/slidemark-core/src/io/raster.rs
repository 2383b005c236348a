use std::path::Path;

use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::detection::{PixelSource, RgbaBuffer};
use crate::error::{Result, SlidemarkError};

/// Decode any format the `image` crate understands into an RGBA8 raster.
pub fn load_raster(path: &Path) -> Result<RgbaBuffer> {
    let img = image::open(path).map_err(|e| SlidemarkError::Decode(format!("{}: {e}", path.display())))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    debug!(path = %path.display(), width = w, height = h, "Raster decoded");
    RgbaBuffer::from_raw(w, h, rgba.into_raw())
}

/// Decode an in-memory encoded image.
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaBuffer> {
    let img = image::load_from_memory(bytes).map_err(|e| SlidemarkError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    RgbaBuffer::from_raw(w, h, rgba.into_raw())
}

/// Downscale so the longest side is at most `max_side`, keeping the aspect
/// ratio. Returns `None` when the raster already fits.
pub fn fit_within(buffer: &RgbaBuffer, max_side: u32) -> Result<Option<RgbaBuffer>> {
    let (w, h) = (buffer.width(), buffer.height());
    let longest = w.max(h);
    if longest <= max_side {
        return Ok(None);
    }
    let scale = max_side.max(1) as f64 / longest as f64;
    let tw = ((w as f64 * scale).round() as u32).clamp(1, max_side.max(1));
    let th = ((h as f64 * scale).round() as u32).clamp(1, max_side.max(1));
    let img = to_image(buffer)?;
    let small = image::imageops::resize(&img, tw, th, FilterType::Triangle);
    debug!(width = w, height = h, to_width = tw, to_height = th, "Raster downscaled");
    RgbaBuffer::from_raw(tw, th, small.into_raw()).map(Some)
}

fn to_image(buffer: &RgbaBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.to_raw()).ok_or(
        SlidemarkError::InvalidDimensions {
            width: buffer.width(),
            height: buffer.height(),
        },
    )
}

/// Save an RGBA8 raster as PNG.
pub fn save_png(buffer: &RgbaBuffer, path: &Path) -> Result<()> {
    let img = to_image(buffer)?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
