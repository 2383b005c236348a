use ndarray::Array3;

use crate::error::{Result, SlidemarkError};

/// Read access to decoded raster pixels.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// RGBA at integer pixel coordinates. Callers stay within `width x height`.
    fn sample_rgba(&self, x: u32, y: u32) -> [u8; 4];
}

/// In-memory RGBA8 raster, shape = (height, width, 4).
#[derive(Clone, Debug)]
pub struct RgbaBuffer {
    pub data: Array3<u8>,
}

impl RgbaBuffer {
    /// Wrap a row-major RGBA8 byte buffer.
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SlidemarkError::InvalidDimensions { width, height });
        }
        let data = Array3::from_shape_vec((height as usize, width as usize, 4), bytes)
            .map_err(|e| SlidemarkError::Decode(e.to_string()))?;
        Ok(Self { data })
    }

    /// Solid-color raster.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let bytes = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::from_raw(width, height, bytes)
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        for (c, v) in rgba.into_iter().enumerate() {
            self.data[[y as usize, x as usize, c]] = v;
        }
    }

    /// Row-major RGBA8 bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
}

impl PixelSource for RgbaBuffer {
    fn width(&self) -> u32 {
        self.data.dim().1 as u32
    }

    fn height(&self) -> u32 {
        self.data.dim().0 as u32
    }

    fn sample_rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let (row, col) = (y as usize, x as usize);
        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
            self.data[[row, col, 3]],
        ]
    }
}
