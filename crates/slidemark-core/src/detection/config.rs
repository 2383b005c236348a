use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_LOOSE_MAX_CHROMA, DEFAULT_LOOSE_WHITE_LUMINANCE, DEFAULT_SINGLE_WHITE_THRESHOLD,
    DEFAULT_STRICT_MAX_CHROMA, DEFAULT_STRICT_WHITE_LUMINANCE, DEFAULT_TISSUE_STRIDE,
};

/// One near-white background tier: luminance at least `min_luminance` and
/// channel spread at most `max_chroma`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTier {
    pub min_luminance: f32,
    pub max_chroma: u8,
}

/// Rule separating tissue from scanner background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClassificationRule {
    /// Background if the pixel matches either the strict or the loose tier.
    DualThreshold {
        strict: BackgroundTier,
        loose: BackgroundTier,
    },
    /// Tissue if any channel is darker than `white`.
    SingleThreshold { white: u8 },
}

impl Default for ClassificationRule {
    fn default() -> Self {
        Self::DualThreshold {
            strict: BackgroundTier {
                min_luminance: DEFAULT_STRICT_WHITE_LUMINANCE,
                max_chroma: DEFAULT_STRICT_MAX_CHROMA,
            },
            loose: BackgroundTier {
                min_luminance: DEFAULT_LOOSE_WHITE_LUMINANCE,
                max_chroma: DEFAULT_LOOSE_MAX_CHROMA,
            },
        }
    }
}

impl ClassificationRule {
    pub fn single_threshold() -> Self {
        Self::SingleThreshold {
            white: DEFAULT_SINGLE_WHITE_THRESHOLD,
        }
    }
}

impl fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DualThreshold { strict, loose } => write!(
                f,
                "Dual threshold (L>={:.0}/C<={}, L>={:.0}/C<={})",
                strict.min_luminance, strict.max_chroma, loose.min_luminance, loose.max_chroma
            ),
            Self::SingleThreshold { white } => write!(f, "Single threshold (<{white})"),
        }
    }
}

/// Configuration for tissue detection on a raster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TissueConfig {
    /// Scan every `stride`-th pixel along both axes.
    #[serde(default = "default_stride")]
    pub stride: usize,
    #[serde(default)]
    pub rule: ClassificationRule,
}

fn default_stride() -> usize {
    DEFAULT_TISSUE_STRIDE
}

impl Default for TissueConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_TISSUE_STRIDE,
            rule: ClassificationRule::default(),
        }
    }
}
