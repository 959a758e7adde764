use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, GeometryError},
    geometry::{Polygon, circle_of_points},
    patterns::SourcePattern,
};

/// Parameters of the growth algorithm itself.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum distance at which a source can be sensed by a node.
    pub influence_radius: f32,
    /// Distance at which a node reaches a source and consumes it.
    pub consume_radius: f32,
    /// Distance between a new node and its parent.
    pub step_len: f32,
    /// Candidates closer than this to an existing child of the same
    /// parent are dropped.
    pub duplicate_tolerance: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            influence_radius: 100.0,
            consume_radius: 5.0,
            step_len: 5.0,
            duplicate_tolerance: 0.1,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("influence_radius", self.influence_radius),
            ("consume_radius", self.consume_radius),
            ("step_len", self.step_len),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.duplicate_tolerance.is_finite() && self.duplicate_tolerance >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "duplicate_tolerance",
                value: self.duplicate_tolerance,
            });
        }
        if self.consume_radius > self.influence_radius {
            return Err(ConfigError::ConsumeExceedsInfluence {
                consume: self.consume_radius,
                influence: self.influence_radius,
            });
        }
        Ok(())
    }
}

/// An obstacle region, described relative to the scene centre.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleConfig {
    Circle {
        offset: Vec2,
        radius: f32,
        resolution: usize,
    },
    /// Arbitrary outline, given as offsets from the scene centre.
    Polygon { points: Vec<Vec2> },
}

impl ObstacleConfig {
    pub fn to_polygon(&self, center: Vec2) -> Result<Polygon, GeometryError> {
        match self {
            ObstacleConfig::Circle {
                offset,
                radius,
                resolution,
            } => Polygon::new(circle_of_points(center + *offset, *radius, *resolution)),
            ObstacleConfig::Polygon { points } => {
                Polygon::new(points.iter().map(|&p| center + p).collect())
            }
        }
    }
}

/// Everything needed to (re)build a scene from scratch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub growth: Config,
    pub pattern: SourcePattern,
    /// Consecutive rejected samples allowed per placed source when
    /// scattering.
    pub max_attempts_per_source: usize,
    pub obstacles: Vec<ObstacleConfig>,
    pub seed: u64,
    pub center: Vec2,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            growth: Config::default(),
            pattern: SourcePattern::Grid { dx: 12.0, dy: 12.0 },
            max_attempts_per_source: 1000,
            obstacles: vec![ObstacleConfig::Circle {
                offset: Vec2::new(0.0, -70.0),
                radius: 200.0,
                resolution: 100,
            }],
            seed: 0,
            center: Vec2::ZERO,
        }
    }
}

impl SceneConfig {
    pub fn obstacle_polygons(&self) -> Result<Vec<Polygon>, GeometryError> {
        self.obstacles
            .iter()
            .map(|o| o.to_polygon(self.center))
            .collect()
    }
}
