//! Tissue vs. scanner-background classification.
//!
//! The scan visits every `stride`-th pixel and accumulates a bounding box and
//! centroid of tissue samples. The returned region keeps a reference to the
//! pixel source so membership can be re-evaluated at any coordinate with the
//! same rule, including pixels the scan skipped.

use tracing::{debug, warn};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::geometry::{Bounds, Point2D};

use super::config::{BackgroundTier, ClassificationRule, TissueConfig};
use super::source::PixelSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelClass {
    Tissue,
    Background,
    /// Alpha = 0; neither tissue nor background.
    Transparent,
}

/// Classify a single RGBA pixel.
pub fn classify_pixel(rgba: [u8; 4], rule: &ClassificationRule) -> PixelClass {
    let [r, g, b, a] = rgba;
    if a == 0 {
        return PixelClass::Transparent;
    }
    let background = match rule {
        ClassificationRule::DualThreshold { strict, loose } => {
            let luminance = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
            let chroma = r.max(g).max(b) - r.min(g).min(b);
            matches_tier(luminance, chroma, strict) || matches_tier(luminance, chroma, loose)
        }
        ClassificationRule::SingleThreshold { white } => r >= *white && g >= *white && b >= *white,
    };
    if background {
        PixelClass::Background
    } else {
        PixelClass::Tissue
    }
}

fn matches_tier(luminance: f32, chroma: u8, tier: &BackgroundTier) -> bool {
    luminance >= tier.min_luminance && chroma <= tier.max_chroma
}

/// Area of a raster classified as tissue.
#[derive(Clone, Debug)]
pub struct TissueRegion<'a, S: PixelSource + ?Sized> {
    source: &'a S,
    rule: ClassificationRule,
    /// Inclusive pixel bounds of the sampled tissue.
    pub bounds: Bounds,
    pub centroid: Point2D,
    pub tissue_samples: usize,
    pub opaque_samples: usize,
    /// True when no tissue was found and the region is the full raster.
    pub fallback: bool,
}

impl<'a, S: PixelSource + ?Sized> TissueRegion<'a, S> {
    /// Region width in pixels (always >= 1).
    pub fn width(&self) -> f64 {
        self.bounds.width() + 1.0
    }

    /// Region height in pixels (always >= 1).
    pub fn height(&self) -> f64 {
        self.bounds.height() + 1.0
    }

    pub fn raster_width(&self) -> u32 {
        self.source.width()
    }

    pub fn raster_height(&self) -> u32 {
        self.source.height()
    }

    /// Fraction of sampled opaque pixels that were tissue.
    pub fn coverage(&self) -> f64 {
        if self.opaque_samples == 0 {
            0.0
        } else {
            self.tissue_samples as f64 / self.opaque_samples as f64
        }
    }

    /// Re-apply the classification rule directly to the pixel at `(x, y)`.
    /// Coordinates outside the raster are never tissue.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.source.width() as i64 || y >= self.source.height() as i64 {
            return false;
        }
        classify_pixel(self.source.sample_rgba(x as u32, y as u32), &self.rule) == PixelClass::Tissue
    }

    /// True if any pixel on the rings at distance 1..=`radius` around `(x, y)`
    /// (axis-aligned and diagonal neighbours) is tissue.
    pub fn is_near(&self, x: i64, y: i64, radius: i64) -> bool {
        (1..=radius).any(|r| {
            [
                (-r, -r),
                (0, -r),
                (r, -r),
                (-r, 0),
                (r, 0),
                (-r, r),
                (0, r),
                (r, r),
            ]
            .iter()
            .any(|&(dx, dy)| self.contains(x + dx, y + dy))
        })
    }
}

/// Scan a raster for tissue. Never fails: with no tissue pixels the full
/// raster is returned with its geometric center as centroid.
pub fn detect_tissue<'a, S: PixelSource + ?Sized>(
    source: &'a S,
    config: &TissueConfig,
) -> TissueRegion<'a, S> {
    let (w, h) = (source.width(), source.height());
    let stride = config.stride.max(1);

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut tissue = 0usize;
    let mut opaque = 0usize;

    for y in (0..h).step_by(stride) {
        for x in (0..w).step_by(stride) {
            match classify_pixel(source.sample_rgba(x, y), &config.rule) {
                PixelClass::Tissue => {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                    sum_x += x as f64;
                    sum_y += y as f64;
                    tissue += 1;
                    opaque += 1;
                }
                PixelClass::Background => opaque += 1,
                PixelClass::Transparent => {}
            }
        }
    }

    if tissue == 0 {
        warn!(width = w, height = h, "No tissue found, using full raster");
        return TissueRegion {
            source,
            rule: config.rule.clone(),
            bounds: Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: w.saturating_sub(1) as f64,
                max_y: h.saturating_sub(1) as f64,
            },
            centroid: Point2D::new(w as f64 / 2.0, h as f64 / 2.0),
            tissue_samples: 0,
            opaque_samples: opaque,
            fallback: true,
        };
    }

    let region = TissueRegion {
        source,
        rule: config.rule.clone(),
        bounds: Bounds {
            min_x: min_x as f64,
            min_y: min_y as f64,
            max_x: max_x as f64,
            max_y: max_y as f64,
        },
        centroid: Point2D::new(sum_x / tissue as f64, sum_y / tissue as f64),
        tissue_samples: tissue,
        opaque_samples: opaque,
        fallback: false,
    };
    debug!(
        bounds = ?region.bounds,
        coverage = region.coverage(),
        "Tissue region detected"
    );
    region
}
