use crate::detection::{PixelSource, TissueRegion};
use crate::geometry::{AffineTransform, Point2D};

use super::config::ScoreWeights;

/// Per-class sample counts and the resulting score of one transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub samples: usize,
    pub hits: usize,
    pub near_hits: usize,
    pub background: usize,
    pub out_of_bounds: usize,
    pub score: f64,
}

impl ScoreBreakdown {
    pub fn hit_rate(&self, weights: &ScoreWeights) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        (self.hits as f64 + weights.near_hit * self.near_hits as f64) / self.samples as f64
    }
}

/// Map `points` through `transform` and score how well they land on tissue.
///
/// `score = hit_rate - oob_penalty * oob_rate - background_penalty * background_rate`,
/// where near-hits count toward `hit_rate` at `weights.near_hit`.
pub fn score_transform<S: PixelSource + ?Sized>(
    points: &[Point2D],
    transform: &AffineTransform,
    region: &TissueRegion<'_, S>,
    weights: &ScoreWeights,
    near_radius: i64,
) -> ScoreBreakdown {
    let (w, h) = (region.raster_width() as i64, region.raster_height() as i64);
    let mut out = ScoreBreakdown {
        samples: points.len(),
        ..Default::default()
    };

    for p in points {
        let mapped = transform.apply(*p);
        let x = mapped.x.round() as i64;
        let y = mapped.y.round() as i64;
        if x < 0 || y < 0 || x >= w || y >= h {
            out.out_of_bounds += 1;
        } else if region.contains(x, y) {
            out.hits += 1;
        } else if region.is_near(x, y, near_radius) {
            out.near_hits += 1;
        } else {
            out.background += 1;
        }
    }

    out.score = if out.samples == 0 {
        f64::NEG_INFINITY
    } else {
        let n = out.samples as f64;
        out.hit_rate(weights)
            - weights.oob_penalty * out.out_of_bounds as f64 / n
            - weights.background_penalty * out.background as f64 / n
    };
    out
}
