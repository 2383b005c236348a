use std::path::Path;

use console::Style;
use slidemark_core::align::Registration;
use slidemark_core::geometry::CoordinateMapping;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    warning: Style,
    error: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            warning: Style::new().dim().yellow(),
            error: Style::new().red(),
            path: Style::new().underlined(),
        }
    }
}

pub struct BatchRow {
    pub slug: String,
    pub paths: usize,
    pub registered: bool,
    pub score: Option<f64>,
}

pub fn print_registration_summary(
    raster: &Path,
    annotations: &str,
    mapping: &CoordinateMapping,
    registration: Option<&Registration>,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Slidemark Registration"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(22)));
    println!();
    println!("  {:<14}{}", s.label.apply_to("Raster"), s.path.apply_to(raster.display()));
    println!("  {:<14}{}", s.label.apply_to("Annotations"), s.path.apply_to(annotations));
    println!("  {:<14}{}", s.label.apply_to("Mapping"), s.method.apply_to(mapping));
    println!();

    let Some(reg) = registration else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Solver"),
            s.warning.apply_to("skipped (declared source extent)")
        );
        println!();
        return;
    };

    println!("  {}", s.header.apply_to("Solver"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Score"),
        s.value.apply_to(format!("{:.4}", reg.score.score))
    );
    let n = reg.score.samples.max(1) as f64;
    for (label, count) in [
        ("Hits", reg.score.hits),
        ("Near hits", reg.score.near_hits),
        ("Background", reg.score.background),
        ("Outside", reg.score.out_of_bounds),
    ] {
        println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.value.apply_to(format!("{} ({:.1}%)", count, count as f64 / n * 100.0))
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Search"),
        s.value.apply_to(format!(
            "{} candidates, {} evaluations",
            reg.candidates, reg.evaluations
        ))
    );
    if reg.fallback_region {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Tissue"),
            s.warning.apply_to("none found, searched against full raster")
        );
    }
    println!();
}

pub fn print_batch_summary(results: &[(String, anyhow::Result<BatchRow>)]) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Slidemark Batch"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    let mut failed = 0;
    for (slug, result) in results {
        match result {
            Ok(row) => {
                let how = if row.registered { "registered" } else { "ratio" };
                let score = row
                    .score
                    .map(|v| format!("{v:.4}"))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "  {:<24}{:>6} paths  {:<11}{}",
                    s.value.apply_to(&row.slug),
                    row.paths,
                    s.method.apply_to(how),
                    s.label.apply_to(score)
                );
            }
            Err(e) => {
                failed += 1;
                println!("  {:<24}{}", s.value.apply_to(slug), s.error.apply_to(format!("{e:#}")));
            }
        }
    }
    println!();
    println!(
        "  {} of {} samples processed",
        results.len() - failed,
        results.len()
    );
}
