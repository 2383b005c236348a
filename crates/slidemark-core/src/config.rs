//! TOML configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::SolverConfig;
use crate::detection::TissueConfig;
use crate::editor::ExportConfig;
use crate::error::Result;
use crate::geometry::SourceExtent;
use crate::overlay::OverlayStyle;
use crate::viewport::ViewportConfig;

/// One catalog entry: a raster with its annotation payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleEntry {
    pub slug: String,
    pub title: String,
    /// Raster path.
    pub image: String,
    /// Annotation path or URL.
    pub annotations: String,
    /// Declared annotation extent; when both are set registration is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_height: Option<f64>,
}

impl SampleEntry {
    pub fn source_extent(&self) -> Option<SourceExtent> {
        match (self.source_width, self.source_height) {
            (Some(width), Some(height)) if width > 0.0 && height > 0.0 => {
                Some(SourceExtent { width, height })
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidemarkConfig {
    pub detection: TissueConfig,
    pub solver: SolverConfig,
    pub viewport: ViewportConfig,
    pub overlay: OverlayStyle,
    pub export: ExportConfig,
    pub samples: Vec<SampleEntry>,
}

impl SlidemarkConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.solver.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), samples = config.samples.len(), "Config loaded");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Catalog lookup, case-insensitive on the slug.
    pub fn sample(&self, slug: &str) -> Option<&SampleEntry> {
        self.samples
            .iter()
            .find(|s| s.slug.eq_ignore_ascii_case(slug.trim()))
    }
}
