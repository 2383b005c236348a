//! Vector overlay of annotation geometry over a raster.
//!
//! In the affine case path coordinates stay in annotation space and a single
//! group transform maps them onto the raster. In the ratio case coordinates
//! are pre-scaled into raster pixels and no group transform is needed.

pub mod composite;
pub mod paths;

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    DEFAULT_OVERLAY_FILL, DEFAULT_OVERLAY_STROKE, DEFAULT_RASTER_STROKE_WIDTH,
    DEFAULT_SVG_STROKE_WIDTH,
};
use crate::geometry::{AffineTransform, CoordinateMapping, Point2D, Ring};
use crate::io::geojson::FeatureCollection;

pub use composite::composite_overlay;
pub use paths::{path_data, OverlayPath};

/// Fill and stroke of overlay paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub fill: [u8; 4],
    pub stroke: [u8; 4],
    /// Vector output stroke width; strokes do not scale with the group transform.
    pub stroke_width: f32,
    /// Stroke width in pixels when compositing onto a raster.
    pub raster_stroke_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill: DEFAULT_OVERLAY_FILL,
            stroke: DEFAULT_OVERLAY_STROKE,
            stroke_width: DEFAULT_SVG_STROKE_WIDTH,
            raster_stroke_width: DEFAULT_RASTER_STROKE_WIDTH,
        }
    }
}

fn css_rgba(c: [u8; 4]) -> String {
    format!("rgba({},{},{},{:.3})", c[0], c[1], c[2], c[3] as f32 / 255.0)
}

/// Rendered overlay: paths plus how they reach raster pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub paths: Vec<OverlayPath>,
    /// Group transform for the affine case; `None` when paths are already in
    /// raster pixels.
    pub group_transform: Option<AffineTransform>,
    pub width: u32,
    pub height: u32,
}

impl Overlay {
    /// Path rings mapped to raster-pixel space.
    pub fn display_rings(&self) -> impl Iterator<Item = Ring> + '_ {
        let group = self.group_transform;
        self.paths.iter().flat_map(move |path| {
            path.rings.iter().map(move |ring| match group {
                Some(t) => ring.iter().map(|p| t.apply(*p)).collect(),
                None => ring.clone(),
            })
        })
    }

    pub fn ring_count(&self) -> usize {
        self.paths.iter().map(|p| p.rings.len()).sum()
    }

    pub fn to_svg(&self, style: &OverlayStyle) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        match self.group_transform {
            Some(t) => {
                let _ = writeln!(
                    svg,
                    r#"<g transform="matrix({} 0 0 {} {} {})">"#,
                    t.a, t.d, t.e, t.f
                );
            }
            None => svg.push_str("<g>\n"),
        }
        for path in &self.paths {
            let _ = writeln!(
                svg,
                r#"<path d="{}" fill="{}" fill-rule="evenodd" stroke="{}" stroke-width="{}" vector-effect="non-scaling-stroke"/>"#,
                path.d,
                css_rgba(style.fill),
                css_rgba(style.stroke),
                style.stroke_width
            );
        }
        svg.push_str("</g>\n</svg>\n");
        svg
    }
}

/// How annotation coordinates are placed onto the raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayPlacement {
    /// Paths keep annotation coordinates under one group transform.
    Grouped(AffineTransform),
    /// Coordinates are mapped point by point before path generation.
    PreMapped(CoordinateMapping),
}

impl From<CoordinateMapping> for OverlayPlacement {
    fn from(mapping: CoordinateMapping) -> Self {
        match mapping {
            CoordinateMapping::Affine(t) => Self::Grouped(t),
            other => Self::PreMapped(other),
        }
    }
}

impl fmt::Display for OverlayPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grouped(t) => write!(f, "Group transform ({t})"),
            Self::PreMapped(m) => write!(f, "Pre-mapped ({m})"),
        }
    }
}

/// Converts a feature collection into overlay paths.
#[derive(Clone, Debug, Default)]
pub struct OverlayRenderer;

impl OverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    /// One path per ring-set. Null or unsupported geometry contributes nothing.
    pub fn render(
        &self,
        collection: &FeatureCollection,
        placement: impl Into<OverlayPlacement>,
        width: u32,
        height: u32,
    ) -> Overlay {
        let placement = placement.into();
        let (group_transform, mapping) = match placement {
            OverlayPlacement::Grouped(t) => (Some(t), CoordinateMapping::Identity),
            OverlayPlacement::PreMapped(m) => (None, m),
        };

        let paths: Vec<OverlayPath> = collection
            .geometries()
            .flat_map(|g| g.polygons().to_vec())
            .map(|polygon| OverlayPath::from_polygon(&polygon, |p: Point2D| mapping.to_display(p)))
            .collect();

        debug!(paths = paths.len(), %placement, "Overlay rendered");
        Overlay {
            paths,
            group_transform,
            width,
            height,
        }
    }
}
