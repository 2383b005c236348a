//! Burn an overlay into a copy of the raster.

use tiny_skia::{
    Color, ColorU8, FillRule, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::detection::{PixelSource, RgbaBuffer};
use crate::error::{Result, SlidemarkError};

use super::{Overlay, OverlayStyle};

fn paint_from(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
    paint.anti_alias = true;
    paint
}

/// Fill (even-odd) and stroke every overlay path onto `raster`.
pub fn composite_overlay(
    raster: &RgbaBuffer,
    overlay: &Overlay,
    style: &OverlayStyle,
) -> Result<RgbaBuffer> {
    let (w, h) = (raster.width(), raster.height());
    let mut pixmap = Pixmap::new(w, h).ok_or(SlidemarkError::InvalidDimensions {
        width: w,
        height: h,
    })?;

    let source = raster.to_raw();
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(source.chunks_exact(4)) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }

    let fill = paint_from(style.fill);
    let stroke_paint = paint_from(style.stroke);
    let stroke = Stroke {
        width: style.raster_stroke_width,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    // One path per ring-set so holes cut through the fill.
    let group = overlay.group_transform;
    for path in &overlay.paths {
        let mut pb = PathBuilder::new();
        for ring in path.rings.iter().filter(|r| r.len() >= 2) {
            let mut points = ring.iter().map(|p| match group {
                Some(t) => t.apply(*p),
                None => *p,
            });
            if let Some(first) = points.next() {
                pb.move_to(first.x as f32, first.y as f32);
                for p in points {
                    pb.line_to(p.x as f32, p.y as f32);
                }
                pb.close();
            }
        }
        if let Some(shape) = pb.finish() {
            pixmap.fill_path(&shape, &fill, FillRule::EvenOdd, Transform::identity(), None);
            pixmap.stroke_path(&shape, &stroke_paint, &stroke, Transform::identity(), None);
        }
    }

    let bytes = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaBuffer::from_raw(w, h, bytes)
}
