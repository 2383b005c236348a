//! Annotation point clouds and their outlier-resistant extent.

use crate::consts::{MIN_CLOUD_EXTENT, ROBUST_HIGH_PERCENTILE, ROBUST_LOW_PERCENTILE};
use crate::geometry::{open_ring, Point2D};
use crate::io::geojson::FeatureCollection;

use super::config::CloudSource;

/// Collect the solver's input points from an annotation payload.
pub fn point_cloud(collection: &FeatureCollection, source: CloudSource) -> Vec<Point2D> {
    let polygons = collection.polygons();
    match source {
        CloudSource::Vertices => polygons
            .iter()
            .flat_map(|p| p.rings())
            .flat_map(|r| open_ring(r).iter().copied())
            .collect(),
        CloudSource::Centroids => polygons.iter().filter_map(|p| p.centroid()).collect(),
    }
}

/// Linear-interpolated percentile of an ascending slice. `p` is in [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Per-axis 1st/50th/99th percentiles of a point cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobustStats {
    pub low: Point2D,
    pub median: Point2D,
    pub high: Point2D,
}

impl RobustStats {
    pub fn of(points: &[Point2D]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        xs.sort_unstable_by(f64::total_cmp);
        ys.sort_unstable_by(f64::total_cmp);

        let at = |p: f64| Point2D::new(percentile(&xs, p), percentile(&ys, p));
        Some(Self {
            low: at(ROBUST_LOW_PERCENTILE),
            median: at(50.0),
            high: at(ROBUST_HIGH_PERCENTILE),
        })
    }

    /// Robust width, floored so a degenerate cloud never yields zero.
    pub fn width(&self) -> f64 {
        (self.high.x - self.low.x).max(MIN_CLOUD_EXTENT)
    }

    pub fn height(&self) -> f64 {
        (self.high.y - self.low.y).max(MIN_CLOUD_EXTENT)
    }
}

/// Uniform sub-sample keeping at most `cap` points (every k-th point).
pub fn subsample(points: &[Point2D], cap: usize) -> Vec<Point2D> {
    let cap = cap.max(1);
    if points.len() <= cap {
        return points.to_vec();
    }
    let stride = points.len().div_ceil(cap);
    points.iter().step_by(stride).copied().collect()
}
