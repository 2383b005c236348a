use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use slidemark_core::geometry::CoordinateMapping;
use slidemark_core::io::{load_annotations, load_raster};

use super::{resolve_mapping, PlacementArgs};
use crate::summary::print_registration_summary;

#[derive(Args)]
pub struct RegisterArgs {
    /// Input raster
    pub file: PathBuf,

    /// Annotation payload: GeoJSON path or http(s) URL
    pub annotations: String,

    #[command(flatten)]
    pub placement: PlacementArgs,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &RegisterArgs) -> Result<()> {
    let config = args.placement.load_config()?;
    let raster = load_raster(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let annotations = load_annotations(&args.annotations)
        .with_context(|| format!("Failed to load annotations {}", args.annotations))?;

    let (mapping, registration) =
        resolve_mapping(&raster, &annotations, args.placement.source_extent(), &config)?;

    if args.json {
        let mut out = json!({ "mapping": mapping.to_string() });
        match mapping {
            CoordinateMapping::Affine(t) => out["transform"] = json!(t),
            CoordinateMapping::Ratio(r) => out["ratio"] = json!(r),
            CoordinateMapping::Identity => {}
        }
        if let Some(ref reg) = registration {
            out["score"] = json!(reg.score.score);
            out["hits"] = json!(reg.score.hits);
            out["near_hits"] = json!(reg.score.near_hits);
            out["background"] = json!(reg.score.background);
            out["out_of_bounds"] = json!(reg.score.out_of_bounds);
            out["samples"] = json!(reg.score.samples);
            out["candidates"] = json!(reg.candidates);
            out["evaluations"] = json!(reg.evaluations);
            out["fallback_region"] = json!(reg.fallback_region);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_registration_summary(&args.file, &args.annotations, &mapping, registration.as_ref());
    }

    Ok(())
}
