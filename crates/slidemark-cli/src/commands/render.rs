use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use slidemark_core::detection::PixelSource;
use slidemark_core::io::{load_annotations, load_raster, save_png};
use slidemark_core::overlay::{composite_overlay, OverlayRenderer};

use super::{resolve_mapping, PlacementArgs};

#[derive(Args)]
pub struct RenderArgs {
    /// Input raster
    pub file: PathBuf,

    /// Annotation payload: GeoJSON path or http(s) URL
    pub annotations: String,

    /// Output file; .png composites onto the raster, .svg writes the vector overlay
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let config = args.placement.load_config()?;
    let raster = load_raster(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let annotations = load_annotations(&args.annotations)
        .with_context(|| format!("Failed to load annotations {}", args.annotations))?;

    let (mapping, _) =
        resolve_mapping(&raster, &annotations, args.placement.source_extent(), &config)?;
    let overlay =
        OverlayRenderer::new().render(&annotations, mapping, raster.width(), raster.height());

    match args.output.extension().and_then(|e| e.to_str()) {
        Some("svg") => {
            std::fs::write(&args.output, overlay.to_svg(&config.overlay))
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
        }
        Some("png") => {
            let composite = composite_overlay(&raster, &overlay, &config.overlay)?;
            save_png(&composite, &args.output)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
        }
        _ => bail!(
            "Unsupported output format {} (use .png or .svg)",
            args.output.display()
        ),
    }

    println!(
        "{} paths rendered to {}",
        overlay.paths.len(),
        args.output.display()
    );
    Ok(())
}
