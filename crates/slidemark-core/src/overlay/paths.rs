use std::fmt::Write;

use crate::geometry::{open_ring, Point2D, Polygon, Ring};

/// Drawable outline of one ring-set (a Polygon, or one member of a MultiPolygon).
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayPath {
    /// Rings in path coordinates, exterior first.
    pub rings: Vec<Ring>,
    /// SVG path data, one `M ... Z` subpath per ring.
    pub d: String,
}

impl OverlayPath {
    pub fn from_polygon(polygon: &Polygon, map: impl Fn(Point2D) -> Point2D) -> Self {
        let rings: Vec<Ring> = polygon
            .rings()
            .map(|ring| open_ring(ring).iter().map(|p| map(*p)).collect())
            .collect();
        let d = path_data(&rings);
        Self { rings, d }
    }
}

/// `M x y L x y ... Z` for each non-empty ring.
pub fn path_data(rings: &[Ring]) -> String {
    let mut d = String::new();
    for ring in rings.iter().filter(|r| !r.is_empty()) {
        for (i, p) in ring.iter().enumerate() {
            if !d.is_empty() {
                d.push(' ');
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd} {} {}", fmt_coord(p.x), fmt_coord(p.y));
        }
        d.push_str(" Z");
    }
    d
}

fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".into()
    } else {
        s.to_string()
    }
}
