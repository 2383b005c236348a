use slidemark_core::detection::{PixelSource, RgbaBuffer};
use slidemark_core::error::Result;
use slidemark_core::io::fit_within;

/// Upload layout for an RGBA raster. The buffer stores straight alpha.
fn raster_to_color_image(raster: &RgbaBuffer) -> egui::ColorImage {
    let size = [raster.width() as usize, raster.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, &raster.to_raw())
}

/// Texture image for `raster`, downscaled when it exceeds the backend's
/// texture limit. The viewport stretches it over the full raster extent.
pub fn texture_image(raster: &RgbaBuffer, max_side: usize) -> Result<egui::ColorImage> {
    let max_side = u32::try_from(max_side).unwrap_or(u32::MAX);
    Ok(match fit_within(raster, max_side)? {
        Some(small) => raster_to_color_image(&small),
        None => raster_to_color_image(raster),
    })
}
