use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use slidemark_core::config::{SampleEntry, SlidemarkConfig};
use slidemark_core::detection::PixelSource;
use slidemark_core::geometry::CoordinateMapping;
use slidemark_core::io::{load_annotations, load_raster, save_png};
use slidemark_core::overlay::{composite_overlay, OverlayRenderer};

use super::{load_config, resolve_mapping};
use crate::summary::{print_batch_summary, BatchRow};

#[derive(Args)]
pub struct BatchArgs {
    /// TOML config with a [[samples]] catalog
    #[arg(short, long)]
    pub config: PathBuf,

    /// Write a <slug>-overlay.png composite per sample into this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Only process these slugs (case-insensitive)
    #[arg(long)]
    pub only: Vec<String>,
}

fn process_sample(
    sample: &SampleEntry,
    config: &SlidemarkConfig,
    output_dir: Option<&Path>,
) -> Result<BatchRow> {
    let raster = load_raster(Path::new(&sample.image))
        .with_context(|| format!("Failed to load {}", sample.image))?;
    let annotations = load_annotations(&sample.annotations)
        .with_context(|| format!("Failed to load annotations {}", sample.annotations))?;
    let (mapping, registration) =
        resolve_mapping(&raster, &annotations, sample.source_extent(), config)?;

    let overlay =
        OverlayRenderer::new().render(&annotations, mapping, raster.width(), raster.height());

    if let Some(dir) = output_dir {
        let composite = composite_overlay(&raster, &overlay, &config.overlay)?;
        let path = dir.join(format!("{}-overlay.png", sample.slug));
        save_png(&composite, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(BatchRow {
        slug: sample.slug.clone(),
        paths: overlay.paths.len(),
        registered: matches!(mapping, CoordinateMapping::Affine(_)),
        score: registration.map(|r| r.score.score),
    })
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let config = load_config(Some(args.config.as_path()))?;
    let samples: Vec<&SampleEntry> = if args.only.is_empty() {
        config.samples.iter().collect()
    } else {
        args.only
            .iter()
            .map(|slug| {
                config
                    .sample(slug)
                    .with_context(|| format!("Unknown sample {slug}"))
            })
            .collect::<Result<_>>()?
    };

    if let Some(ref dir) = args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Registering [{bar:40}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let results: Vec<(String, Result<BatchRow>)> = samples
        .par_iter()
        .map(|sample| {
            let row = process_sample(sample, &config, args.output_dir.as_deref());
            pb.set_message(sample.slug.clone());
            pb.inc(1);
            (sample.slug.clone(), row)
        })
        .collect();
    pb.finish_and_clear();

    print_batch_summary(&results);
    Ok(())
}
