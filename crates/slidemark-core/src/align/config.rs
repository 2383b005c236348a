use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BACKGROUND_PENALTY, DEFAULT_INITIAL_STEP_DIVISOR, DEFAULT_NEAR_HIT_RADIUS,
    DEFAULT_NEAR_HIT_WEIGHT, DEFAULT_OOB_PENALTY, DEFAULT_REFINEMENT_ROUNDS,
    DEFAULT_SCALE_MULTIPLIERS, DEFAULT_SCORE_SAMPLE_CAP, MAX_SCORE_SAMPLE_CAP,
    MIN_SCORE_SAMPLE_CAP,
};
use crate::error::{Result, SlidemarkError};

/// Which annotation points feed the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudSource {
    /// Every ring vertex.
    #[default]
    Vertices,
    /// One vertex-average centroid per polygon.
    Centroids,
}

impl fmt::Display for CloudSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertices => write!(f, "Ring vertices"),
            Self::Centroids => write!(f, "Polygon centroids"),
        }
    }
}

/// Relative weights of the sample classes in a transform score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub near_hit: f64,
    pub oob_penalty: f64,
    pub background_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            near_hit: DEFAULT_NEAR_HIT_WEIGHT,
            oob_penalty: DEFAULT_OOB_PENALTY,
            background_penalty: DEFAULT_BACKGROUND_PENALTY,
        }
    }
}

/// Search-space and scoring parameters for the transform solver.
///
/// The weights and the multiplier grid are empirical; tune them against
/// real slides rather than trusting the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Per-axis multipliers applied to the base tissue/cloud scale. Every
    /// x/y combination is tried for each of the four flip orientations.
    pub scale_multipliers: Vec<f64>,
    pub weights: ScoreWeights,
    /// Hill-climbing rounds per candidate.
    pub refinement_rounds: usize,
    /// Maximum points mapped per score evaluation.
    pub sample_cap: usize,
    /// Ring radius (pixels) searched for near-hits.
    pub near_hit_radius: i64,
    /// Initial translation step = max(raster w, h) / divisor.
    pub initial_step_divisor: f64,
    pub cloud_source: CloudSource,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            scale_multipliers: DEFAULT_SCALE_MULTIPLIERS.to_vec(),
            weights: ScoreWeights::default(),
            refinement_rounds: DEFAULT_REFINEMENT_ROUNDS,
            sample_cap: DEFAULT_SCORE_SAMPLE_CAP,
            near_hit_radius: DEFAULT_NEAR_HIT_RADIUS,
            initial_step_divisor: DEFAULT_INITIAL_STEP_DIVISOR,
            cloud_source: CloudSource::default(),
        }
    }
}

impl SolverConfig {
    /// Reject settings the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SlidemarkError::InvalidSolverConfig(msg));
        if self.scale_multipliers.is_empty() {
            return invalid("scale_multipliers is empty".into());
        }
        if let Some(m) = self
            .scale_multipliers
            .iter()
            .find(|m| !m.is_finite() || **m <= 0.0)
        {
            return invalid(format!("scale multiplier {m} must be finite and positive"));
        }
        if !self.initial_step_divisor.is_finite() || self.initial_step_divisor <= 0.0 {
            return invalid(format!(
                "initial_step_divisor {} must be finite and positive",
                self.initial_step_divisor
            ));
        }
        if !(MIN_SCORE_SAMPLE_CAP..=MAX_SCORE_SAMPLE_CAP).contains(&self.sample_cap) {
            return invalid(format!(
                "sample_cap {} outside {MIN_SCORE_SAMPLE_CAP}..={MAX_SCORE_SAMPLE_CAP}",
                self.sample_cap
            ));
        }
        if self.near_hit_radius < 0 {
            return invalid(format!("near_hit_radius {} is negative", self.near_hit_radius));
        }
        Ok(())
    }
}
