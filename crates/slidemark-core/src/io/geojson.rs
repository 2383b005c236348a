//! GeoJSON-shaped annotation payloads.
//!
//! Only `Polygon` and `MultiPolygon` geometry is understood. Geometry is kept
//! as raw JSON and decoded on access so one malformed feature never rejects
//! the whole collection.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::geometry::{Bounds, MultiPolygon, Point2D, Polygon, Ring};

fn feature_collection_tag() -> String {
    "FeatureCollection".into()
}

fn feature_tag() -> String {
    "Feature".into()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_tag")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Foreign members (`name`, `metadata`, `crs`, ...), carried through untouched.
    #[serde(flatten)]
    pub foreign: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Raw geometry; `None` for `null` or a missing member.
    #[serde(default)]
    pub geometry: Option<Value>,
    /// Opaque to this crate.
    #[serde(default)]
    pub properties: Value,
}

/// Decoded feature geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

/// Counts reported by [`FeatureCollection::stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub features: usize,
    pub skipped: usize,
    pub polygons: usize,
    pub rings: usize,
    pub vertices: usize,
}

impl Geometry {
    /// Decode a GeoJSON geometry object. Unsupported types and malformed
    /// coordinates yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = value.get("type")?.as_str()?;
        let coords = value.get("coordinates")?;
        match kind {
            "Polygon" => parse_polygon(coords).map(Self::Polygon),
            "MultiPolygon" => coords
                .as_array()?
                .iter()
                .map(parse_polygon)
                .collect::<Option<Vec<_>>>()
                .map(Self::MultiPolygon),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Polygon(p) => json!({
                "type": "Polygon",
                "coordinates": polygon_coordinates(p),
            }),
            Self::MultiPolygon(m) => json!({
                "type": "MultiPolygon",
                "coordinates": m.iter().map(polygon_coordinates).collect::<Vec<_>>(),
            }),
        }
    }

    /// Ring-sets in this geometry: one for a Polygon, one per member of a MultiPolygon.
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Self::Polygon(p) => std::slice::from_ref(p),
            Self::MultiPolygon(m) => m.as_slice(),
        }
    }
}

fn parse_position(value: &Value) -> Option<Point2D> {
    let arr = value.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    let x = arr[0].as_f64()?;
    let y = arr[1].as_f64()?;
    (x.is_finite() && y.is_finite()).then_some(Point2D::new(x, y))
}

fn parse_ring(value: &Value) -> Option<Ring> {
    value.as_array()?.iter().map(parse_position).collect()
}

fn parse_polygon(value: &Value) -> Option<Polygon> {
    let rings = value
        .as_array()?
        .iter()
        .map(parse_ring)
        .collect::<Option<Vec<_>>>()?;
    Polygon::from_rings(rings)
}

fn polygon_coordinates(p: &Polygon) -> Vec<Vec<[f64; 2]>> {
    p.rings()
        .map(|ring| ring.iter().map(|pt| [pt.x, pt.y]).collect())
        .collect()
}

impl Feature {
    pub fn new(geometry: &Geometry, properties: Value) -> Self {
        Self {
            kind: feature_tag(),
            id: None,
            geometry: Some(geometry.to_value()),
            properties,
        }
    }

    /// Decoded geometry, or `None` when it is null, unsupported or malformed.
    pub fn geometry(&self) -> Option<Geometry> {
        let raw = self.geometry.as_ref()?;
        let decoded = Geometry::from_value(raw);
        if decoded.is_none() {
            let kind = raw.get("type").and_then(serde_json::Value::as_str).unwrap_or("?");
            debug!(kind, "Skipping unsupported feature geometry");
        }
        decoded
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: feature_collection_tag(),
            features,
            foreign: Map::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decoded geometries in feature order; unusable features are skipped.
    pub fn geometries(&self) -> impl Iterator<Item = Geometry> + '_ {
        self.features.iter().filter_map(Feature::geometry)
    }

    /// Every ring-set in the collection, flattened.
    pub fn polygons(&self) -> Vec<Polygon> {
        self.geometries()
            .flat_map(|g| g.polygons().to_vec())
            .collect()
    }

    /// Extent of all polygon vertices. Falls back to `{0, 0, 1, 1}` when there
    /// are none; width and height are never below 1.
    pub fn bounds(&self) -> Bounds {
        let polygons = self.polygons();
        let points = polygons.iter().flat_map(|p| p.rings()).flatten();
        match Bounds::of_points(points) {
            Some(b) => Bounds {
                max_x: b.max_x.max(b.min_x + 1.0),
                max_y: b.max_y.max(b.min_y + 1.0),
                ..b
            },
            None => Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1.0,
                max_y: 1.0,
            },
        }
    }

    pub fn stats(&self) -> CollectionStats {
        let mut stats = CollectionStats {
            features: self.features.len(),
            ..Default::default()
        };
        for feature in &self.features {
            match feature.geometry() {
                Some(geometry) => {
                    for polygon in geometry.polygons() {
                        stats.polygons += 1;
                        stats.rings += polygon.rings().count();
                        stats.vertices += polygon.vertex_count();
                    }
                }
                None => stats.skipped += 1,
            }
        }
        stats
    }
}
