//! Closed polygons and point containment.
//!
//! A [`Polygon`] is used both as the growth boundary and as obstacle
//! regions. Points lying on an edge (within [`EDGE_TOLERANCE`]) count as
//! inside, so a node touching an obstacle outline is treated as being in
//! the obstacle.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::{error::GeometryError, types::EDGE_TOLERANCE};

/// Axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Smallest rectangle containing all `points`, or `None` if empty.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment, widened by `margin` on every side.
    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        p.x >= self.min.x - margin
            && p.x <= self.max.x + margin
            && p.y >= self.min.y - margin
            && p.y <= self.max.y + margin
    }
}

/// A simple (non self-intersecting) closed polygon.
///
/// The last point connects back to the first; callers should not repeat
/// the first point at the end.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
    bounds: Rect,
}

impl Polygon {
    /// Validates and wraps an outline.
    ///
    /// ### Errors
    /// - [`GeometryError::TooFewPoints`] for fewer than three points.
    /// - [`GeometryError::NonFinite`] if any coordinate is NaN or infinite.
    /// - [`GeometryError::SelfIntersecting`] if two non-adjacent edges
    ///   touch or cross.
    /// - [`GeometryError::ZeroArea`] if every point lies on one line.
    pub fn new(points: Vec<Vec2>) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFinite { index });
        }
        check_simple(&points)?;
        if signed_area(&points).abs() < f32::EPSILON {
            return Err(GeometryError::ZeroArea);
        }

        let bounds = Rect::from_points(&points).ok_or(GeometryError::TooFewPoints(0))?;
        Ok(Self { points, bounds })
    }

    /// Translates an outline so the centre of its bounding box lands on
    /// `center`, then validates it.
    ///
    /// This is how externally loaded outlines (e.g. from a vector asset) are
    /// placed into the scene.
    pub fn centered_at(points: Vec<Vec2>, center: Vec2) -> Result<Self, GeometryError> {
        let Some(bounds) = Rect::from_points(&points) else {
            return Err(GeometryError::TooFewPoints(0));
        };
        let shift = center - bounds.center();
        Self::new(points.into_iter().map(|p| p + shift).collect())
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Iterates over the edges as `(start, end)` pairs, closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Point-in-polygon test. Points on an edge count as inside.
    pub fn contains(&self, p: Vec2) -> bool {
        if !self.bounds.contains_with_margin(p, EDGE_TOLERANCE) {
            return false;
        }
        if self
            .edges()
            .any(|(a, b)| distance_to_segment(p, a, b) <= EDGE_TOLERANCE)
        {
            return true;
        }

        // Even-odd ray cast towards +x.
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Growth is allowed at `p` if it is inside `boundary` and not inside any
/// obstacle.
pub fn is_free(boundary: &Polygon, obstacles: &[Polygon], p: Vec2) -> bool {
    boundary.contains(p) && !obstacles.iter().any(|o| o.contains(p))
}

/// Evenly spaced points on a circle, counter-clockwise from +x.
pub fn circle_of_points(center: Vec2, radius: f32, resolution: usize) -> Vec<Vec2> {
    (0..resolution)
        .map(|i| {
            let t = i as f32 / resolution as f32 * TAU;
            center + Vec2::new(t.cos(), t.sin()) * radius
        })
        .collect()
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Shoelace area; positive for counter-clockwise outlines.
fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    0.5 * (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f32>()
}

fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

/// `c` is collinear with `a..b`; is it within the segment's box?
fn within_box(a: Vec2, b: Vec2, c: Vec2) -> bool {
    c.x >= a.x.min(b.x) && c.x <= a.x.max(b.x) && c.y >= a.y.min(b.y) && c.y <= a.y.max(b.y)
}

fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_box(c, d, a))
        || (d2 == 0.0 && within_box(c, d, b))
        || (d3 == 0.0 && within_box(a, b, c))
        || (d4 == 0.0 && within_box(a, b, d))
}

fn check_simple(points: &[Vec2]) -> Result<(), GeometryError> {
    let n = points.len();
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        // Edge i shares a vertex with i-1 and i+1; skip those.
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (points[j], points[(j + 1) % n]);
            if segments_intersect(a, b, c, d) {
                return Err(GeometryError::SelfIntersecting {
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}
