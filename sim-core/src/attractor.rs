use crate::types::NodeId;
use glam::Vec2;

/// A point that pulls nearby vein tips towards itself until one of them
/// reaches it.
#[derive(Clone, Debug, PartialEq)]
pub struct AttractorSource {
    pub pos: Vec2,
    pub influence_radius: f32,
    pub consume_radius: f32,
    pub alive: bool,
    /// Nodes this source pulled on during the current step. Cleared at the
    /// end of every step.
    pub influencing: Vec<NodeId>,
}

impl AttractorSource {
    pub fn new(pos: Vec2, influence_radius: f32, consume_radius: f32) -> Self {
        Self {
            pos,
            influence_radius,
            consume_radius,
            alive: true,
            influencing: Vec::new(),
        }
    }

    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        self.pos.distance(p)
    }

    #[inline]
    pub fn is_within_influence(&self, p: Vec2) -> bool {
        self.distance_to(p) <= self.influence_radius
    }

    #[inline]
    pub fn is_consumed_by(&self, p: Vec2) -> bool {
        self.distance_to(p) <= self.consume_radius
    }
}

#[derive(Clone, Debug, Default)]
pub struct AttractorSet {
    pub points: Vec<AttractorSource>,
}

impl AttractorSet {
    pub fn from_positions(positions: Vec<Vec2>, influence_radius: f32, consume_radius: f32) -> Self {
        let points = positions
            .into_iter()
            .map(|pos| AttractorSource::new(pos, influence_radius, consume_radius))
            .collect();

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.points.iter().filter(|a| a.alive).count()
    }

    /// Drops every source that is no longer alive and returns how many
    /// were removed.
    pub fn remove_consumed(&mut self) -> usize {
        let before = self.points.len();
        self.points.retain(|a| a.alive);
        before - self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_queries_are_inclusive() {
        let a = AttractorSource::new(Vec2::new(0.0, 10.0), 10.0, 2.0);

        assert_eq!(a.distance_to(Vec2::ZERO), 10.0);
        assert!(a.is_within_influence(Vec2::ZERO));
        assert!(!a.is_within_influence(Vec2::new(0.0, -0.5)));

        assert!(a.is_consumed_by(Vec2::new(0.0, 8.0)));
        assert!(!a.is_consumed_by(Vec2::new(0.0, 7.9)));
    }

    #[test]
    fn remove_consumed_only_drops_dead_sources() {
        let mut set = AttractorSet::from_positions(
            vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            10.0,
            1.0,
        );
        set.points[1].alive = false;

        assert_eq!(set.alive_count(), 2);
        assert_eq!(set.remove_consumed(), 1);
        assert_eq!(set.len(), 2);
        assert!(set.points.iter().all(|a| a.alive));

        // Nothing left to remove.
        assert_eq!(set.remove_consumed(), 0);
    }
}
