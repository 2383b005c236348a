use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_HANDLE_RADIUS, DEFAULT_TAP_SLOP, DEFAULT_WHEEL_ZOOM_STEP, MAX_ZOOM, MIN_ZOOM,
};

/// Interaction limits and tolerances for a viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per wheel notch.
    pub wheel_step: f64,
    /// Screen-pixel travel below which a press/release is a tap.
    pub tap_slop: f64,
    /// Screen-pixel hit radius of vertex handles.
    pub handle_radius: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_step: DEFAULT_WHEEL_ZOOM_STEP,
            tap_slop: DEFAULT_TAP_SLOP,
            handle_radius: DEFAULT_HANDLE_RADIUS,
        }
    }
}
