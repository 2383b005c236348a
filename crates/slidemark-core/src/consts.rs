/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Default pixel stride for the tissue scan along both axes.
pub const DEFAULT_TISSUE_STRIDE: usize = 2;

/// Strict background tier: minimum luminance (0-255).
pub const DEFAULT_STRICT_WHITE_LUMINANCE: f32 = 235.0;

/// Strict background tier: maximum channel spread (max - min).
pub const DEFAULT_STRICT_MAX_CHROMA: u8 = 20;

/// Loose background tier: minimum luminance (0-255).
pub const DEFAULT_LOOSE_WHITE_LUMINANCE: f32 = 215.0;

/// Loose background tier: maximum channel spread (max - min).
pub const DEFAULT_LOOSE_MAX_CHROMA: u8 = 10;

/// Single-threshold rule: a pixel with any channel below this value is tissue.
pub const DEFAULT_SINGLE_WHITE_THRESHOLD: u8 = 235;

/// Per-axis scale multipliers tried around the base tissue/cloud scale.
pub const DEFAULT_SCALE_MULTIPLIERS: [f64; 12] =
    [0.45, 0.55, 0.65, 0.75, 0.85, 1.0, 1.15, 1.3, 1.5, 1.8, 2.3, 3.0];

/// Score weight of a near-hit relative to a direct tissue hit.
pub const DEFAULT_NEAR_HIT_WEIGHT: f64 = 0.35;

/// Score penalty per out-of-bounds sample (as a rate).
pub const DEFAULT_OOB_PENALTY: f64 = 1.2;

/// Score penalty per background sample (as a rate).
pub const DEFAULT_BACKGROUND_PENALTY: f64 = 1.0;

/// Hill-climbing rounds per orientation/scale candidate.
pub const DEFAULT_REFINEMENT_ROUNDS: usize = 8;

/// Maximum number of annotation points mapped per score evaluation.
pub const DEFAULT_SCORE_SAMPLE_CAP: usize = 1000;

/// Accepted range for a configured score sample cap.
pub const MIN_SCORE_SAMPLE_CAP: usize = 500;
pub const MAX_SCORE_SAMPLE_CAP: usize = 1500;

/// Radius (pixels) of the ring searched for near-hits.
pub const DEFAULT_NEAR_HIT_RADIUS: i64 = 2;

/// Initial translation step = max(raster width, raster height) / divisor.
pub const DEFAULT_INITIAL_STEP_DIVISOR: f64 = 5.0;

/// Lower robust percentile used for annotation cloud bounds.
pub const ROBUST_LOW_PERCENTILE: f64 = 1.0;

/// Upper robust percentile used for annotation cloud bounds.
pub const ROBUST_HIGH_PERCENTILE: f64 = 99.0;

/// Smallest robust cloud extent, so degenerate clouds never divide by zero.
pub const MIN_CLOUD_EXTENT: f64 = 1.0;

/// Zoom limits relative to the base fit scale.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;

/// Zoom change per wheel notch.
pub const DEFAULT_WHEEL_ZOOM_STEP: f64 = 0.2;

/// Pointer travel (screen pixels) below which a press/release counts as a tap.
pub const DEFAULT_TAP_SLOP: f64 = 6.0;

/// Hit radius (screen pixels) of vertex handles and the draft's first point.
pub const DEFAULT_HANDLE_RADIUS: f64 = 8.0;

/// Minimum vertex count of a committed polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Decimal places kept in exported coordinates.
pub const EXPORT_DECIMALS: i32 = 3;

/// Overlay fill, RGBA.
pub const DEFAULT_OVERLAY_FILL: [u8; 4] = [46, 204, 113, 36];

/// Overlay stroke, RGBA.
pub const DEFAULT_OVERLAY_STROKE: [u8; 4] = [39, 174, 96, 217];

/// Overlay stroke width in SVG output (non-scaling).
pub const DEFAULT_SVG_STROKE_WIDTH: f32 = 0.9;

/// Overlay stroke width (pixels) when compositing onto a raster.
pub const DEFAULT_RASTER_STROKE_WIDTH: f32 = 2.0;

/// Provenance note attached to exported annotation payloads.
pub const DEFAULT_EXPORT_NOTE: &str = "Edited polygons exported from slidemark";
