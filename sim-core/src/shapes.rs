//! Built-in boundary shapes and their default root placements.
//!
//! All offsets are relative to the scene centre with y pointing up.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::GeometryError,
    geometry::{Polygon, circle_of_points},
};

const SQUARE_SIDE: f32 = 800.0;
const SQUARE_ROOT_CANDIDATES: usize = 10;
const CIRCLE_RADIUS: f32 = 350.0;
const CIRCLE_RESOLUTION: usize = 100;
const LEAF_HALF_WIDTH: f32 = 300.0;
const LEAF_HEIGHT: f32 = 900.0;
const LEAF_SAMPLES: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryShape {
    #[default]
    Triangle,
    Square,
    Circle,
    Leaf,
}

impl BoundaryShape {
    pub const ALL: [BoundaryShape; 4] = [
        BoundaryShape::Triangle,
        BoundaryShape::Square,
        BoundaryShape::Circle,
        BoundaryShape::Leaf,
    ];

    /// Maps the shortcut digits `1..=4` onto shapes.
    pub fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            1..=4 => Some(Self::ALL[digit as usize - 1]),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BoundaryShape::Triangle => "Triangle",
            BoundaryShape::Square => "Square",
            BoundaryShape::Circle => "Circle",
            BoundaryShape::Leaf => "Leaf",
        }
    }

    /// Outline vertices of this shape around `center`.
    pub fn outline(self, center: Vec2) -> Vec<Vec2> {
        match self {
            BoundaryShape::Triangle => triangle_outline(center),
            BoundaryShape::Square => square_outline(center),
            BoundaryShape::Circle => circle_of_points(center, CIRCLE_RADIUS, CIRCLE_RESOLUTION),
            BoundaryShape::Leaf => leaf_outline(center),
        }
    }

    pub fn polygon(self, center: Vec2) -> Result<Polygon, GeometryError> {
        Polygon::new(self.outline(center))
    }

    /// Candidate root positions for this shape.
    ///
    /// The square scatters several candidates over its bounds; the other
    /// shapes use one fixed root near their lower edge. Candidates are not
    /// filtered here; the network rejects those outside the boundary or
    /// inside an obstacle.
    pub fn root_candidates(self, center: Vec2, boundary: &Polygon, rng: &mut impl Rng) -> Vec<Vec2> {
        match self {
            BoundaryShape::Triangle => vec![center + Vec2::new(-340.0, -290.0)],
            BoundaryShape::Circle => vec![center + Vec2::new(0.0, -300.0)],
            BoundaryShape::Leaf => vec![center + Vec2::new(0.0, -420.0)],
            BoundaryShape::Square => {
                let b = boundary.bounds();
                (0..SQUARE_ROOT_CANDIDATES)
                    .map(|_| {
                        Vec2::new(
                            rng.random_range(b.min.x..=b.max.x),
                            rng.random_range(b.min.y..=b.max.y),
                        )
                    })
                    .collect()
            }
        }
    }
}

fn triangle_outline(center: Vec2) -> Vec<Vec2> {
    [
        Vec2::new(-400.0, -300.0),
        Vec2::new(400.0, -300.0),
        Vec2::new(0.0, 350.0),
    ]
    .into_iter()
    .map(|p| center + p)
    .collect()
}

fn square_outline(center: Vec2) -> Vec<Vec2> {
    let h = SQUARE_SIDE / 2.0;
    [
        Vec2::new(-h, -h),
        Vec2::new(h, -h),
        Vec2::new(h, h),
        Vec2::new(-h, h),
    ]
    .into_iter()
    .map(|p| center + p)
    .collect()
}

/// Ovate leaf: base at the bottom, pointed tip at the top, widest below
/// the middle.
fn leaf_outline(center: Vec2) -> Vec<Vec2> {
    let half_height = LEAF_HEIGHT / 2.0;
    let side = |t: f32| {
        let w = LEAF_HALF_WIDTH * t.sin() * (1.0 + 0.35 * t.cos());
        (w, -half_height * t.cos())
    };

    let mut pts = Vec::with_capacity(2 * LEAF_SAMPLES);
    for i in 0..=LEAF_SAMPLES {
        let (w, y) = side(PI * i as f32 / LEAF_SAMPLES as f32);
        pts.push(center + Vec2::new(w.max(0.0), y));
    }
    for i in (1..LEAF_SAMPLES).rev() {
        let (w, y) = side(PI * i as f32 / LEAF_SAMPLES as f32);
        pts.push(center + Vec2::new(-w, y));
    }
    pts
}
