//! Space-colonization growth of 2-D vein networks.
//!
//! Main components:
//! - [`geometry`] — polygons and point containment for boundaries and obstacles.
//! - [`shapes`] — built-in boundary shapes and their root placements.
//! - [`attractor`] — attractor sources and sets.
//! - [`patterns`] — initial source layouts (scatter, grid).
//! - [`tree`] — the append-only vein node arena.
//! - [`influence_buffer`] — per-step accumulated growth directions.
//! - [`phases`] — the ordered phases of one growth step.
//! - [`network`] — the growth network and its `step` operation.
//! - [`simulation`] — scene context and commands for the outer loop.
//! - [`config`] — growth and scene parameters.
//! - [`error`] — error types.
//! - [`types`] — shared type aliases and tolerances.

pub mod attractor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod influence_buffer;
pub mod network;
pub mod patterns;
pub mod phases;
pub mod shapes;
pub mod simulation;
pub mod tree;
pub mod types;
