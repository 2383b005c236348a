#![allow(dead_code)]

use serde_json::json;

use slidemark_core::detection::RgbaBuffer;
use slidemark_core::io::geojson::{Feature, FeatureCollection};

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const STAIN: [u8; 4] = [200, 120, 170, 255];

/// White raster with an H&E-pink rectangle covering `x0..x1` x `y0..y1`.
pub fn raster_with_tissue(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> RgbaBuffer {
    let mut raster = RgbaBuffer::filled(width, height, WHITE).unwrap();
    for y in y0..y1 {
        for x in x0..x1 {
            raster.put_pixel(x, y, STAIN);
        }
    }
    raster
}

pub fn white_raster(width: u32, height: u32) -> RgbaBuffer {
    RgbaBuffer::filled(width, height, WHITE).unwrap()
}

/// Axis-aligned square polygon geometry, explicitly closed.
pub fn square_geometry(x: f64, y: f64, size: f64) -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]
        ]]
    })
}

pub fn feature(geometry: serde_json::Value) -> Feature {
    Feature {
        kind: "Feature".into(),
        id: None,
        geometry: Some(geometry),
        properties: json!({}),
    }
}

/// A grid of small squares spanning `0..=cols*step` x `0..=rows*step`.
pub fn square_grid(cols: usize, rows: usize, step: f64, size: f64) -> FeatureCollection {
    let mut features = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            features.push(feature(square_geometry(
                col as f64 * step,
                row as f64 * step,
                size,
            )));
        }
    }
    FeatureCollection::new(features)
}
