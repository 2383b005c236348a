use slidemark_core::align::CloudSource;
use slidemark_core::config::SlidemarkConfig;
use slidemark_core::consts::{
    DEFAULT_EXPORT_NOTE, DEFAULT_REFINEMENT_ROUNDS, DEFAULT_SCALE_MULTIPLIERS,
    DEFAULT_TISSUE_STRIDE, MAX_ZOOM, MIN_ZOOM,
};
use slidemark_core::detection::ClassificationRule;
use slidemark_core::error::SlidemarkError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_defaults_match_constants() {
    let config = SlidemarkConfig::default();
    assert_eq!(config.detection.stride, DEFAULT_TISSUE_STRIDE);
    assert_eq!(config.detection.rule, ClassificationRule::default());
    assert_eq!(config.solver.scale_multipliers, DEFAULT_SCALE_MULTIPLIERS.to_vec());
    assert_eq!(config.solver.refinement_rounds, DEFAULT_REFINEMENT_ROUNDS);
    assert_eq!(config.solver.weights.near_hit, 0.35);
    assert_eq!(config.solver.weights.oob_penalty, 1.2);
    assert_eq!(config.solver.weights.background_penalty, 1.0);
    assert_eq!(config.solver.cloud_source, CloudSource::Vertices);
    assert_eq!(config.viewport.min_zoom, MIN_ZOOM);
    assert_eq!(config.viewport.max_zoom, MAX_ZOOM);
    assert_eq!(config.export.note, DEFAULT_EXPORT_NOTE);
    assert!(config.samples.is_empty());
}

#[test]
fn test_scale_grid_spans_expected_range() {
    assert_eq!(DEFAULT_SCALE_MULTIPLIERS.len(), 12);
    assert_eq!(DEFAULT_SCALE_MULTIPLIERS[0], 0.45);
    assert_eq!(DEFAULT_SCALE_MULTIPLIERS[11], 3.0);
    assert!(DEFAULT_SCALE_MULTIPLIERS.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_cloud_source_display() {
    assert_eq!(format!("{}", CloudSource::Vertices), "Ring vertices");
    assert_eq!(format!("{}", CloudSource::Centroids), "Polygon centroids");
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_toml_round_trip() {
    let mut config = SlidemarkConfig::default();
    config.solver.cloud_source = CloudSource::Centroids;
    config.detection.rule = ClassificationRule::single_threshold();
    let text = config.to_toml().unwrap();
    let parsed = SlidemarkConfig::from_toml(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let text = r#"
[solver]
refinement_rounds = 4
scale_multipliers = [1.0, 2.0]

[viewport]
max_zoom = 16.0
"#;
    let config = SlidemarkConfig::from_toml(text).unwrap();
    assert_eq!(config.solver.refinement_rounds, 4);
    assert_eq!(config.solver.scale_multipliers, vec![1.0, 2.0]);
    assert_eq!(config.solver.sample_cap, 1000);
    assert_eq!(config.viewport.max_zoom, 16.0);
    assert_eq!(config.viewport.min_zoom, 1.0);
    assert_eq!(config.detection.stride, 2);
}

#[test]
fn test_invalid_toml_is_an_error() {
    assert!(SlidemarkConfig::from_toml("[solver\nrefinement_rounds = ").is_err());
}

#[test]
fn test_unusable_solver_settings_are_rejected() {
    for text in [
        "[solver]\nscale_multipliers = []",
        "[solver]\nscale_multipliers = [1.0, -0.5]",
        "[solver]\ninitial_step_divisor = 0.0",
        "[solver]\nsample_cap = 10",
        "[solver]\nsample_cap = 50000",
    ] {
        let result = SlidemarkConfig::from_toml(text);
        assert!(
            matches!(result, Err(SlidemarkError::InvalidSolverConfig(_))),
            "accepted: {text}"
        );
    }
    assert!(SlidemarkConfig::from_toml("[solver]\nsample_cap = 1500").is_ok());
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

const CATALOG: &str = r#"
[[samples]]
slug = "wt1-adenine-x20"
title = "WT1 Adenine x20"
image = "public/analysis-detail/wt1-adenine-x20.png"
annotations = "public/geojson/wt1-adenine-x20.geojson"
source_width = 13300
source_height = 19432

[[samples]]
slug = "wt4-normal-x20"
title = "WT4 Normal x20"
image = "wt4.png"
annotations = "https://example.org/wt4.geojson"
"#;

#[test]
fn test_sample_lookup_is_case_insensitive() {
    let config = SlidemarkConfig::from_toml(CATALOG).unwrap();
    assert_eq!(config.samples.len(), 2);
    let sample = config.sample("WT1-Adenine-X20").unwrap();
    assert_eq!(sample.title, "WT1 Adenine x20");
    assert!(config.sample("missing").is_none());
}

#[test]
fn test_sample_source_extent() {
    let config = SlidemarkConfig::from_toml(CATALOG).unwrap();
    let extent = config.sample("wt1-adenine-x20").unwrap().source_extent().unwrap();
    assert_eq!(extent.width, 13300.0);
    assert_eq!(extent.height, 19432.0);
    assert!(config.sample("wt4-normal-x20").unwrap().source_extent().is_none());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slidemark.toml");
    std::fs::write(&path, CATALOG).unwrap();
    let config = SlidemarkConfig::load(&path).unwrap();
    assert_eq!(config.samples.len(), 2);
    assert!(SlidemarkConfig::load(&dir.path().join("missing.toml")).is_err());
}
