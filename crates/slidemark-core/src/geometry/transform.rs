use std::fmt;

use serde::{Deserialize, Serialize};

use super::Point2D;
use crate::error::SlidemarkError;

/// Axis-aligned affine map `(x, y) -> (a*x + e, d*y + f)`.
///
/// Negative `a`/`d` encode a flip. There is no rotation or shear term.
/// `a` and `d` are never zero for transforms produced by this crate;
/// deserialization goes through [`AffineTransform::new`] to keep it that way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAffine")]
pub struct AffineTransform {
    pub a: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Returns `None` if either scale term is zero or non-finite.
    pub fn new(a: f64, d: f64, e: f64, f: f64) -> Option<Self> {
        let valid = a != 0.0 && d != 0.0 && [a, d, e, f].iter().all(|v| v.is_finite());
        valid.then_some(Self { a, d, e, f })
    }

    pub fn apply(&self, p: Point2D) -> Point2D {
        Point2D::new(self.a * p.x + self.e, self.d * p.y + self.f)
    }

    pub fn inverse(&self) -> Self {
        Self {
            a: 1.0 / self.a,
            d: 1.0 / self.d,
            e: -self.e / self.a,
            f: -self.f / self.d,
        }
    }

    /// Map a raster point back into annotation space.
    pub fn invert_point(&self, p: Point2D) -> Point2D {
        Point2D::new((p.x - self.e) / self.a, (p.y - self.f) / self.d)
    }

    pub fn with_translation(&self, e: f64, f: f64) -> Self {
        Self { e, f, ..*self }
    }

    pub fn is_flipped_x(&self) -> bool {
        self.a < 0.0
    }

    pub fn is_flipped_y(&self) -> bool {
        self.d < 0.0
    }
}

#[derive(Deserialize)]
struct RawAffine {
    a: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl TryFrom<RawAffine> for AffineTransform {
    type Error = SlidemarkError;

    fn try_from(raw: RawAffine) -> Result<Self, Self::Error> {
        Self::new(raw.a, raw.d, raw.e, raw.f)
            .ok_or(SlidemarkError::InvalidTransform { a: raw.a, d: raw.d })
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x' = {:.6}*x + {:.2}, y' = {:.6}*y + {:.2}",
            self.a, self.e, self.d, self.f
        )
    }
}

/// Declared width/height of the coordinate space annotations were authored in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceExtent {
    pub width: f64,
    pub height: f64,
}

/// Known per-axis ratio between annotation space and raster-pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleRatio {
    pub x: f64,
    pub y: f64,
}

impl ScaleRatio {
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    /// Ratio raster / source per axis. `None` if any extent is not positive.
    pub fn from_extents(raster_width: u32, raster_height: u32, source: SourceExtent) -> Option<Self> {
        if raster_width == 0 || raster_height == 0 || source.width <= 0.0 || source.height <= 0.0 {
            return None;
        }
        Some(Self {
            x: raster_width as f64 / source.width,
            y: raster_height as f64 / source.height,
        })
    }

    pub fn apply(&self, p: Point2D) -> Point2D {
        Point2D::new(p.x * self.x, p.y * self.y)
    }

    pub fn invert_point(&self, p: Point2D) -> Point2D {
        Point2D::new(p.x / self.x, p.y / self.y)
    }
}

/// How annotation coordinates reach raster-pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum CoordinateMapping {
    #[default]
    Identity,
    /// Declared source extent, registration skipped.
    Ratio(ScaleRatio),
    /// Transform recovered by the solver.
    Affine(AffineTransform),
}

impl CoordinateMapping {
    pub fn to_display(&self, p: Point2D) -> Point2D {
        match self {
            Self::Identity => p,
            Self::Ratio(r) => r.apply(p),
            Self::Affine(t) => t.apply(p),
        }
    }

    pub fn to_source(&self, p: Point2D) -> Point2D {
        match self {
            Self::Identity => p,
            Self::Ratio(r) => r.invert_point(p),
            Self::Affine(t) => t.invert_point(p),
        }
    }
}

impl fmt::Display for CoordinateMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::Ratio(r) => write!(f, "Ratio ({:.6}, {:.6})", r.x, r.y),
            Self::Affine(t) => write!(f, "Affine ({t})"),
        }
    }
}
