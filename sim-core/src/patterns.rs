//! Initial attractor layouts.
//!
//! Every generated source lies inside the boundary and outside all
//! obstacles, and carries the radii from [`Config`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    attractor::AttractorSet,
    config::Config,
    error::GenerationError,
    geometry::{Polygon, is_free},
};

/// Upper bound on the lattice points [`grid`] will test.
pub const MAX_GRID_CANDIDATES: f64 = 4_000_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourcePattern {
    /// `count` uniformly random sources.
    Scatter { count: usize },
    /// A regular lattice with spacing `dx` by `dy`.
    Grid { dx: f32, dy: f32 },
}

impl SourcePattern {
    pub fn generate(
        &self,
        cfg: &Config,
        boundary: &Polygon,
        obstacles: &[Polygon],
        max_attempts_per_source: usize,
        rng: &mut impl Rng,
    ) -> Result<AttractorSet, GenerationError> {
        match *self {
            SourcePattern::Scatter { count } => scatter(
                count,
                cfg,
                boundary,
                obstacles,
                max_attempts_per_source,
                rng,
            ),
            SourcePattern::Grid { dx, dy } => grid(dx, dy, cfg, boundary, obstacles),
        }
    }
}

/// Rejection-samples `count` sources from the boundary's bounding box.
///
/// Gives up with [`GenerationError::InsufficientSpace`] once
/// `max_attempts_per_source` samples in a row have been rejected.
pub fn scatter(
    count: usize,
    cfg: &Config,
    boundary: &Polygon,
    obstacles: &[Polygon],
    max_attempts_per_source: usize,
    rng: &mut impl Rng,
) -> Result<AttractorSet, GenerationError> {
    let b = boundary.bounds();
    let mut positions = Vec::with_capacity(count);
    let mut rejected = 0;

    while positions.len() < count {
        if rejected >= max_attempts_per_source {
            warn!(
                requested = count,
                placed = positions.len(),
                "giving up on scattering sources"
            );
            return Err(GenerationError::InsufficientSpace {
                requested: count,
                placed: positions.len(),
                attempts: rejected,
            });
        }

        let p = Vec2::new(
            rng.random_range(b.min.x..=b.max.x),
            rng.random_range(b.min.y..=b.max.y),
        );
        if is_free(boundary, obstacles, p) {
            positions.push(p);
            rejected = 0;
        } else {
            rejected += 1;
        }
    }

    debug!(count, "scattered sources");
    Ok(AttractorSet::from_positions(
        positions,
        cfg.influence_radius,
        cfg.consume_radius,
    ))
}

/// Places sources on a lattice anchored at the bounding box's minimum
/// corner, row by row (increasing y, then increasing x).
///
/// ### Errors
/// - [`GenerationError::InvalidSpacing`] for non-positive or non-finite
///   spacing.
/// - [`GenerationError::GridTooDense`] if the lattice would exceed
///   [`MAX_GRID_CANDIDATES`] points.
pub fn grid(
    dx: f32,
    dy: f32,
    cfg: &Config,
    boundary: &Polygon,
    obstacles: &[Polygon],
) -> Result<AttractorSet, GenerationError> {
    if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
        return Err(GenerationError::InvalidSpacing { dx, dy });
    }

    let b = boundary.bounds();
    let cols = (f64::from(b.width()) / f64::from(dx)).floor() + 1.0;
    let rows = (f64::from(b.height()) / f64::from(dy)).floor() + 1.0;
    if cols * rows > MAX_GRID_CANDIDATES {
        warn!(cols, rows, "refusing to lay out source grid");
        return Err(GenerationError::GridTooDense { cols, rows });
    }
    let (cols, rows) = (cols as usize, rows as usize);

    let positions: Vec<Vec2> = (0..rows)
        .flat_map(|j| (0..cols).map(move |i| b.min + Vec2::new(i as f32 * dx, j as f32 * dy)))
        .filter(|&p| is_free(boundary, obstacles, p))
        .collect();

    debug!(count = positions.len(), rows, cols, "laid out source grid");
    Ok(AttractorSet::from_positions(
        positions,
        cfg.influence_radius,
        cfg.consume_radius,
    ))
}
