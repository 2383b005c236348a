mod common;

use slidemark_core::align::{
    point_cloud, register, score_transform, CloudSource, ScoreWeights, SolverConfig,
    TransformSolver,
};
use slidemark_core::detection::{detect_tissue, RgbaBuffer, TissueConfig};
use slidemark_core::error::SlidemarkError;
use slidemark_core::geometry::{AffineTransform, Point2D};

use common::{raster_with_tissue, square_grid, white_raster, STAIN};

/// Grid of points spanning 0..=240 x 0..=200 in annotation space.
fn grid_points() -> Vec<Point2D> {
    let mut points = Vec::new();
    for yi in 0..=20 {
        for xi in 0..=24 {
            points.push(Point2D::new(xi as f64 * 10.0, yi as f64 * 10.0));
        }
    }
    points
}

fn small_config() -> SolverConfig {
    SolverConfig {
        scale_multipliers: vec![0.75, 1.0, 1.3],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[test]
fn test_score_counts_each_class() {
    let raster = raster_with_tissue(100, 100, 40, 40, 60, 60);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let weights = ScoreWeights::default();
    let points = vec![
        Point2D::new(50.0, 50.0),  // hit
        Point2D::new(38.0, 50.0),  // near-hit at 2px
        Point2D::new(10.0, 10.0),  // background
        Point2D::new(-5.0, 10.0),  // out of bounds
        Point2D::new(100.2, 10.0), // rounds to 100: out of bounds
    ];
    let s = score_transform(&points, &AffineTransform::IDENTITY, &region, &weights, 2);

    assert_eq!(s.samples, 5);
    assert_eq!(s.hits, 1);
    assert_eq!(s.near_hits, 1);
    assert_eq!(s.background, 1);
    assert_eq!(s.out_of_bounds, 2);
    let expected = (1.0 + 0.35) / 5.0 - 1.2 * 2.0 / 5.0 - 1.0 / 5.0;
    assert!((s.score - expected).abs() < 1e-12, "score={} expected={}", s.score, expected);
}

#[test]
fn test_all_hits_score_one() {
    let raster = raster_with_tissue(50, 50, 0, 0, 50, 50);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points = vec![Point2D::new(1.0, 1.0), Point2D::new(25.4, 30.6)];
    let s = score_transform(
        &points,
        &AffineTransform::IDENTITY,
        &region,
        &ScoreWeights::default(),
        2,
    );
    assert!((s.score - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

#[test]
fn test_candidate_grid_size() {
    let raster = raster_with_tissue(200, 160, 40, 30, 160, 130);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points = grid_points();

    let config = SolverConfig::default();
    let solver = TransformSolver::new(&region, &points, &config).unwrap();
    assert_eq!(solver.candidates().len(), 4 * 12 * 12);

    let small = small_config();
    let solver = TransformSolver::new(&region, &points, &small).unwrap();
    let candidates = solver.candidates();
    assert_eq!(candidates.len(), 4 * 3 * 3);
    assert_eq!(candidates.iter().filter(|c| c.flip_x && c.flip_y).count(), 9);
}

#[test]
fn test_seed_centers_cloud_median_on_tissue_centroid() {
    let raster = raster_with_tissue(200, 160, 40, 30, 160, 130);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points = grid_points();
    let config = small_config();
    let solver = TransformSolver::new(&region, &points, &config).unwrap();

    let median = solver.stats().median;
    for candidate in solver.candidates() {
        let mapped = candidate.seed.apply(median);
        assert!((mapped.x - region.centroid.x).abs() < 1e-9);
        assert!((mapped.y - region.centroid.y).abs() < 1e-9);
        assert_eq!(candidate.seed.is_flipped_x(), candidate.flip_x);
        assert_eq!(candidate.seed.is_flipped_y(), candidate.flip_y);
    }
}

#[test]
fn test_empty_cloud_is_an_error() {
    let raster = white_raster(10, 10);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let config = SolverConfig::default();
    let result = TransformSolver::new(&region, &[], &config);
    assert!(matches!(result, Err(SlidemarkError::EmptyPointCloud)));
}

#[test]
fn test_empty_multiplier_grid_is_a_config_error() {
    let raster = raster_with_tissue(100, 100, 10, 10, 90, 90);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let config = SolverConfig {
        scale_multipliers: Vec::new(),
        ..Default::default()
    };
    let result = TransformSolver::new(&region, &grid_points(), &config);
    assert!(matches!(result, Err(SlidemarkError::InvalidSolverConfig(_))));
}

#[test]
fn test_sample_cap_bounds_evaluation_cost() {
    let raster = raster_with_tissue(100, 100, 10, 10, 90, 90);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points: Vec<Point2D> = (0..5000)
        .map(|i| Point2D::new((i % 100) as f64, (i / 100) as f64))
        .collect();
    let config = SolverConfig::default();
    let solver = TransformSolver::new(&region, &points, &config).unwrap();
    assert!(solver.sample_count() <= 1000);
    assert!(solver.sample_count() >= 500);
}

// ---------------------------------------------------------------------------
// Refinement
// ---------------------------------------------------------------------------

#[test]
fn test_refinement_scores_never_decrease() {
    let raster = raster_with_tissue(200, 160, 40, 30, 160, 130);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points = grid_points();
    let config = SolverConfig::default();
    let solver = TransformSolver::new(&region, &points, &config).unwrap();

    for candidate in solver.candidates().iter().step_by(37) {
        let seed_score = solver.score(&candidate.seed).score;
        let refined = solver.refine(candidate.seed);
        assert_eq!(refined.round_scores.len(), 8);
        assert!(refined.round_scores[0] >= seed_score);
        for pair in refined.round_scores.windows(2) {
            assert!(pair[1] >= pair[0], "score decreased: {:?}", refined.round_scores);
        }
        assert_eq!(refined.evaluations, 1 + 8 * 8);
    }
}

#[test]
fn test_refinement_recovers_translation_offset() {
    let raster = raster_with_tissue(200, 160, 40, 30, 160, 130);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points = grid_points();
    let config = SolverConfig::default();
    let solver = TransformSolver::new(&region, &points, &config).unwrap();

    // Correct scale, translation pushed well off the tissue.
    let seed = AffineTransform::new(0.5, 0.5, 0.0, 0.0).unwrap();
    let before = solver.score(&seed).score;
    let refined = solver.refine(seed);
    assert!(refined.score.score > before);
    assert!(refined.score.score > 0.9, "score={}", refined.score.score);
}

// ---------------------------------------------------------------------------
// Solve
// ---------------------------------------------------------------------------

#[test]
fn test_solve_lands_cloud_on_tissue() {
    let raster = raster_with_tissue(200, 160, 40, 30, 160, 130);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points = grid_points();
    let config = small_config();
    let solver = TransformSolver::new(&region, &points, &config).unwrap();

    let registration = solver.solve().unwrap();
    assert!(!registration.fallback_region);
    assert_eq!(registration.candidates, 36);
    assert!(registration.score.score > 0.9, "score={}", registration.score.score);

    let on_tissue = points
        .iter()
        .map(|p| registration.transform.apply(*p))
        .filter(|p| region.contains(p.x.round() as i64, p.y.round() as i64))
        .count();
    assert!(on_tissue as f64 / points.len() as f64 > 0.9);
}

#[test]
fn test_robust_bounds_ignore_stray_vertex() {
    let raster = raster_with_tissue(200, 160, 40, 30, 160, 130);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let mut points = grid_points();
    points.push(Point2D::new(50_000.0, 50_000.0));
    let config = small_config();
    let solver = TransformSolver::new(&region, &points, &config).unwrap();

    assert!(solver.stats().width() < 300.0);
    let registration = solver.solve().unwrap();
    assert!(registration.score.score > 0.9, "score={}", registration.score.score);
}

#[test]
fn test_register_on_blank_raster_uses_fallback_region() {
    let raster = white_raster(120, 90);
    let collection = square_grid(4, 3, 20.0, 8.0);
    let registration = register(
        &collection,
        &raster,
        &TissueConfig::default(),
        &small_config(),
    )
    .unwrap();
    assert!(registration.fallback_region);
    assert!(registration.transform.a != 0.0 && registration.transform.d != 0.0);
    assert!(registration.score.score.is_finite());
}

#[test]
fn test_register_with_centroid_cloud() {
    let raster = raster_with_tissue(200, 160, 40, 30, 160, 130);
    let collection = square_grid(12, 10, 20.0, 6.0);
    let centroids = point_cloud(&collection, CloudSource::Centroids);
    assert_eq!(centroids.len(), 120);

    let config = SolverConfig {
        cloud_source: CloudSource::Centroids,
        ..small_config()
    };
    let registration = register(&collection, &raster, &TissueConfig::default(), &config).unwrap();
    assert!(registration.score.score > 0.85, "score={}", registration.score.score);
}

// ---------------------------------------------------------------------------
// Orientation and scale recovery
// ---------------------------------------------------------------------------

fn paint(raster: &mut RgbaBuffer, x0: u32, y0: u32, x1: u32, y1: u32) {
    for y in y0..y1 {
        for x in x0..x1 {
            raster.put_pixel(x, y, STAIN);
        }
    }
}

/// L-shaped tissue: a vertical bar with a foot extending right at the bottom.
fn l_shaped_raster() -> RgbaBuffer {
    let mut raster = white_raster(200, 200);
    paint(&mut raster, 40, 40, 80, 160);
    paint(&mut raster, 80, 120, 160, 160);
    raster
}

fn in_l(x: u32, y: u32) -> bool {
    ((40..80).contains(&x) && (40..160).contains(&y)) || ((80..160).contains(&x) && (120..160).contains(&y))
}

/// Annotation space is the raster scaled by 10 with y pointing up.
fn to_annotation(x: f64, y: f64) -> Point2D {
    Point2D::new(x * 10.0, (200.0 - y) * 10.0)
}

#[test]
fn test_solve_recovers_vertical_flip_and_scale() {
    let raster = l_shaped_raster();
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points: Vec<Point2D> = (41..160)
        .step_by(2)
        .flat_map(|y| (41..160).step_by(2).map(move |x| (x, y)))
        .filter(|&(x, y)| in_l(x, y))
        .map(|(x, y)| to_annotation(x as f64, y as f64))
        .collect();
    let config = SolverConfig {
        scale_multipliers: vec![0.85, 1.0, 1.15],
        ..Default::default()
    };
    let solver = TransformSolver::new(&region, &points, &config).unwrap();
    let registration = solver.solve().unwrap();
    let t = registration.transform;

    assert!(t.a > 0.0, "x should not flip: {}", t);
    assert!(t.d < 0.0, "y should flip: {}", t);
    assert!((t.a - 0.1).abs() < 0.02, "{}", t);
    assert!((t.d + 0.1).abs() < 0.02, "{}", t);
    assert!(registration.score.score > 0.8, "score={}", registration.score.score);

    // The corner of the L lands near its raster position.
    let corner = t.apply(to_annotation(60.0, 140.0));
    assert!((corner.x - 60.0).abs() < 10.0 && (corner.y - 140.0).abs() < 10.0, "{:?}", corner);
}

#[test]
fn test_solve_picks_non_unit_multiplier() {
    // A small stray blob widens the tissue bounds to roughly 2.2x the
    // annotated square, so only a ~0.45 multiplier lands the cloud.
    let mut raster = white_raster(200, 200);
    paint(&mut raster, 20, 20, 100, 100);
    paint(&mut raster, 180, 180, 190, 190);
    let region = detect_tissue(&raster, &TissueConfig::default());
    let points: Vec<Point2D> = (1..80)
        .step_by(2)
        .flat_map(|y| (1..80).step_by(2).map(move |x| Point2D::new(x as f64, y as f64)))
        .collect();
    let config = SolverConfig {
        scale_multipliers: vec![0.45, 1.0, 1.5],
        ..Default::default()
    };
    let solver = TransformSolver::new(&region, &points, &config).unwrap();
    let registration = solver.solve().unwrap();
    let t = registration.transform;

    assert!((t.a.abs() - 1.0).abs() < 0.1, "{}", t);
    assert!((t.d.abs() - 1.0).abs() < 0.1, "{}", t);
    assert!(registration.score.score > 0.9, "score={}", registration.score.score);
}
