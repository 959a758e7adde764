//! Error types for the fallible parts of the crate.
//!
//! Growth itself never fails; only construction of geometry, generation
//! of source patterns and configuration validation can.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("polygon point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("polygon edges {first} and {second} intersect")]
    SelfIntersecting { first: usize, second: usize },
    #[error("polygon has zero area")]
    ZeroArea,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    /// Rejection sampling gave up before placing every requested source.
    #[error(
        "insufficient space: placed {placed} of {requested} sources, \
         gave up after {attempts} consecutive rejections"
    )]
    InsufficientSpace {
        requested: usize,
        placed: usize,
        attempts: usize,
    },
    #[error("grid spacing must be positive and finite, got dx={dx}, dy={dy}")]
    InvalidSpacing { dx: f32, dy: f32 },
    /// The lattice would need more candidate points than
    /// [`MAX_GRID_CANDIDATES`](crate::patterns::MAX_GRID_CANDIDATES).
    #[error("grid of {cols} x {rows} candidates is too dense")]
    GridTooDense { cols: f64, rows: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{name}` must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("consume radius {consume} exceeds influence radius {influence}")]
    ConsumeExceedsInfluence { consume: f32, influence: f32 },
}

/// Anything that can go wrong while (re)building a scene.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
