pub mod batch;
pub mod config;
pub mod info;
pub mod register;
pub mod render;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use slidemark_core::align::{register, Registration};
use slidemark_core::config::SlidemarkConfig;
use slidemark_core::detection::{PixelSource, RgbaBuffer};
use slidemark_core::geometry::{CoordinateMapping, ScaleRatio, SourceExtent};
use slidemark_core::io::geojson::FeatureCollection;

/// Options shared by commands that place annotations on a raster.
#[derive(Args)]
pub struct PlacementArgs {
    /// Declared annotation width; with --source-height skips registration
    #[arg(long, requires = "source_height")]
    pub source_width: Option<f64>,

    /// Declared annotation height
    #[arg(long, requires = "source_width")]
    pub source_height: Option<f64>,

    /// TOML config file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,
}

impl PlacementArgs {
    pub fn source_extent(&self) -> Option<SourceExtent> {
        match (self.source_width, self.source_height) {
            (Some(width), Some(height)) => Some(SourceExtent { width, height }),
            _ => None,
        }
    }

    pub fn load_config(&self) -> Result<SlidemarkConfig> {
        load_config(self.config.as_deref())
    }
}

pub fn load_config(path: Option<&Path>) -> Result<SlidemarkConfig> {
    match path {
        Some(p) => SlidemarkConfig::load(p)
            .with_context(|| format!("Failed to read config {}", p.display())),
        None => Ok(SlidemarkConfig::default()),
    }
}

/// Declared ratio when an extent is given, otherwise run registration.
pub fn resolve_mapping(
    raster: &RgbaBuffer,
    annotations: &FeatureCollection,
    extent: Option<SourceExtent>,
    config: &SlidemarkConfig,
) -> Result<(CoordinateMapping, Option<Registration>)> {
    if let Some(extent) = extent {
        let ratio = ScaleRatio::from_extents(raster.width(), raster.height(), extent)
            .context("Declared source extent must be positive")?;
        return Ok((CoordinateMapping::Ratio(ratio), None));
    }
    let registration = register(annotations, raster, &config.detection, &config.solver)?;
    Ok((CoordinateMapping::Affine(registration.transform), Some(registration)))
}
