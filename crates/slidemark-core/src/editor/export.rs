//! User polygons to a GeoJSON payload in annotation space.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::consts::{DEFAULT_EXPORT_NOTE, EXPORT_DECIMALS};
use crate::geometry::{CoordinateMapping, Point2D, Polygon};
use crate::io::geojson::{Feature, FeatureCollection, Geometry};

use super::state::UserPolygon;

/// Export defaults from the configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Provenance note stored in the payload metadata.
    pub note: String,
    /// Title used when the caller supplies none.
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            note: DEFAULT_EXPORT_NOTE.into(),
            title: "Untitled slide".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportMetadata {
    pub title: String,
    pub slug: String,
    pub exported_at: DateTime<Utc>,
    pub note: String,
}

impl ExportMetadata {
    /// Metadata stamped with the current UTC time.
    pub fn now(title: impl Into<String>, slug: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            exported_at: Utc::now(),
            note: note.into(),
        }
    }

    /// `<slug>-annotations.geojson`
    pub fn file_name(&self) -> String {
        export_file_name(&self.slug)
    }

    fn to_value(&self) -> Value {
        json!({
            "title": self.title,
            "slug": self.slug,
            "exported_at": self.exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "note": self.note,
        })
    }
}

pub fn export_file_name(slug: &str) -> String {
    let slug = if slug.trim().is_empty() { "slide" } else { slug.trim() };
    format!("{slug}-annotations.geojson")
}

/// Round to the export precision. Negative zero comes out as zero.
pub fn round_coordinate(v: f64) -> f64 {
    let factor = 10f64.powi(EXPORT_DECIMALS);
    (v * factor).round() / factor + 0.0
}

/// Closed ring in source coordinates: mapped back, rounded, first point repeated.
fn export_ring(points: &[Point2D], mapping: &CoordinateMapping) -> Vec<Point2D> {
    let mut ring: Vec<Point2D> = points
        .iter()
        .map(|p| {
            let s = mapping.to_source(*p);
            Point2D::new(round_coordinate(s.x), round_coordinate(s.y))
        })
        .collect();
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

/// Serialize user polygons, mapping raster pixels back through the inverse
/// of `mapping`.
pub fn export_polygons(
    polygons: &[UserPolygon],
    mapping: &CoordinateMapping,
    metadata: &ExportMetadata,
) -> FeatureCollection {
    let features = polygons
        .iter()
        .map(|poly| {
            let geometry = Geometry::Polygon(Polygon {
                exterior: export_ring(&poly.points, mapping),
                holes: Vec::new(),
            });
            let mut feature = Feature::new(
                &geometry,
                json!({ "id": poly.id, "vertex_count": poly.points.len() }),
            );
            feature.id = Some(json!(poly.id));
            feature
        })
        .collect();

    let mut collection = FeatureCollection::new(features);
    collection
        .foreign
        .insert("name".into(), Value::String(metadata.title.clone()));
    collection.foreign.insert("metadata".into(), metadata.to_value());
    collection
}
