//! Global search for the annotation -> raster transform.
//!
//! There are no correspondence points, so the solver enumerates a discrete
//! grid of flip orientations and per-axis scales, seeds each candidate by
//! aligning the cloud's robust centroid with the tissue centroid, and polishes
//! the translation with a coarse-to-fine hill climb. The best score across all
//! candidates wins.

use tracing::{debug, info};

use crate::detection::{PixelSource, TissueRegion};
use crate::error::{Result, SlidemarkError};
use crate::geometry::{AffineTransform, Point2D};

use super::cloud::{subsample, RobustStats};
use super::config::SolverConfig;
use super::score::{score_transform, ScoreBreakdown};

/// The four axis orientations: (sign x, sign y).
const ORIENTATIONS: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];

/// Translation offsets of the 8 neighbours, in units of the current step.
const NEIGHBORS: [(f64, f64); 8] = [
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
];

/// One orientation/scale combination with its seeded translation.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub flip_x: bool,
    pub flip_y: bool,
    pub multiplier_x: f64,
    pub multiplier_y: f64,
    pub seed: AffineTransform,
}

/// Outcome of hill-climbing a single candidate.
#[derive(Clone, Debug)]
pub struct Refinement {
    pub transform: AffineTransform,
    pub score: ScoreBreakdown,
    /// Best score after each round (length = refinement rounds).
    pub round_scores: Vec<f64>,
    pub evaluations: usize,
}

/// Best transform found by [`TransformSolver::solve`].
#[derive(Clone, Debug)]
pub struct Registration {
    pub transform: AffineTransform,
    pub score: ScoreBreakdown,
    pub candidates: usize,
    pub evaluations: usize,
    /// The tissue region was the full-raster fallback.
    pub fallback_region: bool,
}

pub struct TransformSolver<'r, 'a, S: PixelSource + ?Sized> {
    region: &'r TissueRegion<'a, S>,
    config: &'r SolverConfig,
    stats: RobustStats,
    samples: Vec<Point2D>,
}

impl<'r, 'a, S: PixelSource + ?Sized> TransformSolver<'r, 'a, S> {
    pub fn new(
        region: &'r TissueRegion<'a, S>,
        points: &[Point2D],
        config: &'r SolverConfig,
    ) -> Result<Self> {
        config.validate()?;
        let stats = RobustStats::of(points).ok_or(SlidemarkError::EmptyPointCloud)?;
        Ok(Self {
            region,
            config,
            stats,
            samples: subsample(points, config.sample_cap),
        })
    }

    pub fn stats(&self) -> &RobustStats {
        &self.stats
    }

    /// Number of points mapped per score evaluation.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn score(&self, transform: &AffineTransform) -> ScoreBreakdown {
        score_transform(
            &self.samples,
            transform,
            self.region,
            &self.config.weights,
            self.config.near_hit_radius,
        )
    }

    /// Enumerate orientation x scale-x x scale-y candidates with seeded translation.
    pub fn candidates(&self) -> Vec<Candidate> {
        let base_x = self.region.width() / self.stats.width();
        let base_y = self.region.height() / self.stats.height();
        let centroid = self.region.centroid;
        let median = self.stats.median;

        let mut out = Vec::with_capacity(
            ORIENTATIONS.len() * self.config.scale_multipliers.len().pow(2),
        );
        for &(sx, sy) in &ORIENTATIONS {
            for &mx in &self.config.scale_multipliers {
                for &my in &self.config.scale_multipliers {
                    let a = sx * base_x * mx;
                    let d = sy * base_y * my;
                    let seed = AffineTransform::new(
                        a,
                        d,
                        centroid.x - a * median.x,
                        centroid.y - d * median.y,
                    );
                    if let Some(seed) = seed {
                        out.push(Candidate {
                            flip_x: sx < 0.0,
                            flip_y: sy < 0.0,
                            multiplier_x: mx,
                            multiplier_y: my,
                            seed,
                        });
                    }
                }
            }
        }
        out
    }

    /// Hill-climb the translation of `seed`. Each round evaluates the 8
    /// neighbours one step away, moves to the best improving one, and halves
    /// the step when none improves.
    pub fn refine(&self, seed: AffineTransform) -> Refinement {
        let mut best = seed;
        let mut best_score = self.score(&best);
        let mut evaluations = 1;
        let mut step = self.region.raster_width().max(self.region.raster_height()) as f64
            / self.config.initial_step_divisor;
        let mut round_scores = Vec::with_capacity(self.config.refinement_rounds);

        for _ in 0..self.config.refinement_rounds {
            let mut improved: Option<(AffineTransform, ScoreBreakdown)> = None;
            for &(dx, dy) in &NEIGHBORS {
                let trial = best.with_translation(best.e + dx * step, best.f + dy * step);
                let trial_score = self.score(&trial);
                evaluations += 1;
                let bar = improved.as_ref().map_or(best_score.score, |(_, s)| s.score);
                if trial_score.score > bar {
                    improved = Some((trial, trial_score));
                }
            }
            match improved {
                Some((t, s)) => {
                    best = t;
                    best_score = s;
                }
                None => step /= 2.0,
            }
            round_scores.push(best_score.score);
        }

        Refinement {
            transform: best,
            score: best_score,
            round_scores,
            evaluations,
        }
    }

    /// Refine every candidate and return the globally best transform.
    pub fn solve(&self) -> Result<Registration> {
        let candidates = self.candidates();
        let mut best: Option<Refinement> = None;
        let mut evaluations = 0;

        for candidate in &candidates {
            let refined = self.refine(candidate.seed);
            evaluations += refined.evaluations;
            debug!(
                flip_x = candidate.flip_x,
                flip_y = candidate.flip_y,
                mx = candidate.multiplier_x,
                my = candidate.multiplier_y,
                score = refined.score.score,
                "Candidate refined"
            );
            let better = match &best {
                Some(b) => refined.score.score > b.score.score,
                None => true,
            };
            if better {
                best = Some(refined);
            }
        }

        let best = best.ok_or_else(|| {
            SlidemarkError::InvalidSolverConfig("no candidate produced a valid transform".into())
        })?;
        info!(
            transform = %best.transform,
            score = best.score.score,
            hits = best.score.hits,
            candidates = candidates.len(),
            evaluations,
            "Registration complete"
        );

        Ok(Registration {
            transform: best.transform,
            score: best.score,
            candidates: candidates.len(),
            evaluations,
            fallback_region: self.region.fallback,
        })
    }
}
