use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use slidemark_core::detection::{detect_tissue, PixelSource, TissueConfig};
use slidemark_core::io::{load_annotations, load_raster};

#[derive(Args)]
pub struct InfoArgs {
    /// Input raster (PNG, JPEG, TIFF, ...)
    pub file: PathBuf,

    /// Annotation payload: GeoJSON path or http(s) URL
    #[arg(short, long)]
    pub annotations: Option<String>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let raster = load_raster(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let region = detect_tissue(&raster, &TissueConfig::default());

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", raster.width(), raster.height());
    if region.fallback {
        println!("Tissue:      none found (full raster fallback)");
    } else {
        println!(
            "Tissue:      {:.0}x{:.0} at ({:.0}, {:.0})",
            region.width(),
            region.height(),
            region.bounds.min_x,
            region.bounds.min_y
        );
    }
    println!("Coverage:    {:.1}%", region.coverage() * 100.0);
    println!(
        "Centroid:    ({:.1}, {:.1})",
        region.centroid.x, region.centroid.y
    );

    if let Some(ref source) = args.annotations {
        let collection = load_annotations(source)
            .with_context(|| format!("Failed to load annotations {}", source))?;
        let stats = collection.stats();
        let bounds = collection.bounds();
        println!();
        println!("Annotations: {}", source);
        println!("Features:    {} ({} skipped)", stats.features, stats.skipped);
        println!("Polygons:    {}", stats.polygons);
        println!("Rings:       {}", stats.rings);
        println!("Vertices:    {}", stats.vertices);
        println!(
            "Extent:      ({:.1}, {:.1}) - ({:.1}, {:.1})",
            bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
        );
    }

    Ok(())
}
