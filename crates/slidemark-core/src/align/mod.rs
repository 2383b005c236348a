pub mod cloud;
pub mod config;
pub mod score;
pub mod solver;

pub use cloud::{percentile, point_cloud, subsample, RobustStats};
pub use config::{CloudSource, ScoreWeights, SolverConfig};
pub use score::{score_transform, ScoreBreakdown};
pub use solver::{Candidate, Refinement, Registration, TransformSolver};

use crate::detection::{detect_tissue, PixelSource, TissueConfig};
use crate::error::Result;
use crate::io::geojson::FeatureCollection;

/// Detect tissue on `raster` and solve for the annotation -> raster transform.
pub fn register<S: PixelSource + ?Sized>(
    collection: &FeatureCollection,
    raster: &S,
    tissue: &TissueConfig,
    solver: &SolverConfig,
) -> Result<Registration> {
    let region = detect_tissue(raster, tissue);
    let points = point_cloud(collection, solver.cloud_source);
    TransformSolver::new(&region, &points, solver)?.solve()
}
