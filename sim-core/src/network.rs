//! The growth network: vein forest, attractor sources, and the geometry
//! constraining them.

use glam::Vec2;
use tracing::{debug, info, instrument, warn};

use crate::{
    attractor::{AttractorSet, AttractorSource},
    config::Config,
    geometry::{Polygon, is_free},
    influence_buffer::InfluenceBuffer,
    phases,
    tree::{Tree, VeinNode},
    types::NodeId,
};

/// Coarse state of the network after a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrowthStatus {
    /// At least one node was created or a source was consumed.
    #[default]
    Growing,
    /// Every source has been consumed.
    Exhausted,
    /// Sources remain and some node wanted to grow, but every candidate was
    /// outside the boundary or inside an obstacle.
    Blocked,
    /// Sources remain but none of them produced a usable candidate.
    Dormant,
}

impl GrowthStatus {
    /// `true` if further steps cannot change the network on their own.
    ///
    /// Only meaningful after a step that neither created nodes nor consumed
    /// sources, which is the only way to end up in a non-growing state with
    /// sources left.
    pub fn is_settled(self) -> bool {
        !matches!(self, GrowthStatus::Growing)
    }
}

/// Summary of one call to [`GrowthNetwork::step`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// 1-based index of the step.
    pub step: u64,
    pub created: usize,
    pub consumed: usize,
    pub blocked: usize,
    pub duplicates: usize,
    /// Sources that found a node in range this step.
    pub influenced_sources: usize,
    /// Sources still alive after the step.
    pub alive_sources: usize,
    pub status: GrowthStatus,
}

#[derive(Debug)]
pub struct GrowthNetwork {
    tree: Tree,
    sources: AttractorSet,
    boundary: Polygon,
    obstacles: Vec<Polygon>,
    pub cfg: Config,
    acc: InfluenceBuffer,
    steps: u64,
    status: GrowthStatus,
}

impl GrowthNetwork {
    /// Creates a network with no nodes.
    pub fn new(boundary: Polygon, obstacles: Vec<Polygon>, sources: AttractorSet, cfg: Config) -> Self {
        Self {
            tree: Tree::new(),
            sources,
            boundary,
            obstacles,
            cfg,
            acc: InfluenceBuffer::default(),
            steps: 0,
            status: GrowthStatus::Growing,
        }
    }

    /// Adds a root node if `pos` is inside the boundary and outside every
    /// obstacle.
    pub fn add_root(&mut self, pos: Vec2) -> Option<NodeId> {
        if !is_free(&self.boundary, &self.obstacles, pos) {
            warn!(x = pos.x, y = pos.y, "rejected root outside the growable area");
            return None;
        }
        Some(self.tree.add_root(pos))
    }

    /// Advances the simulation by one iteration.
    ///
    /// Runs influence pairing, growth, consumption and scratch reset in
    /// that order. A network without nodes or without sources simply
    /// reports no change.
    #[instrument(level = "debug", skip(self), fields(step = self.steps + 1))]
    pub fn step(&mut self) -> StepReport {
        self.steps += 1;

        let influenced_sources =
            phases::influence_phase(&self.tree, &mut self.sources, &mut self.acc);
        let growth = phases::growth_phase(
            &mut self.tree,
            &self.acc,
            &self.cfg,
            &self.boundary,
            &self.obstacles,
        );
        let consumed = phases::consume_phase(&self.tree, &mut self.sources);
        phases::reset_phase(&mut self.sources, &mut self.acc);

        let alive_sources = self.sources.alive_count();
        let status = if alive_sources == 0 {
            GrowthStatus::Exhausted
        } else if !growth.created.is_empty() || consumed > 0 {
            // A consumed source changes the next step's pairing.
            GrowthStatus::Growing
        } else if growth.blocked > 0 {
            GrowthStatus::Blocked
        } else {
            GrowthStatus::Dormant
        };

        let report = StepReport {
            step: self.steps,
            created: growth.created.len(),
            consumed,
            blocked: growth.blocked,
            duplicates: growth.duplicates,
            influenced_sources,
            alive_sources,
            status,
        };
        debug!(?report, "step finished");

        if status != self.status {
            match status {
                GrowthStatus::Exhausted => {
                    info!(step = self.steps, nodes = self.tree.len(), "all sources consumed")
                }
                GrowthStatus::Blocked => info!(
                    step = self.steps,
                    alive_sources, "growth blocked by boundary or obstacles"
                ),
                GrowthStatus::Dormant => {
                    info!(step = self.steps, alive_sources, "no source within reach")
                }
                GrowthStatus::Growing => {}
            }
            self.status = status;
        }

        report
    }

    pub fn nodes(&self) -> &[VeinNode] {
        &self.tree.nodes
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn sources(&self) -> &[AttractorSource] {
        &self.sources.points
    }

    pub fn alive_sources(&self) -> usize {
        self.sources.alive_count()
    }

    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    pub fn tips(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree.tips()
    }

    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.path_to_root(id)
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Status reported by the most recent step.
    pub fn status(&self) -> GrowthStatus {
        self.status
    }

    pub fn is_settled(&self) -> bool {
        self.steps > 0 && self.status.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f32) -> Polygon {
        Polygon::new(vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ])
        .unwrap()
    }

    fn cfg() -> Config {
        Config {
            influence_radius: 150.0,
            consume_radius: 5.0,
            step_len: 4.0,
            ..Config::default()
        }
    }

    fn single_source_network(obstacles: Vec<Polygon>) -> GrowthNetwork {
        let cfg = cfg();
        let sources = AttractorSet::from_positions(
            vec![Vec2::new(0.0, 100.0)],
            cfg.influence_radius,
            cfg.consume_radius,
        );
        let mut net = GrowthNetwork::new(square(500.0), obstacles, sources, cfg);
        net.add_root(Vec2::ZERO).unwrap();
        net
    }

    #[test]
    fn first_step_grows_towards_the_source() {
        let mut net = single_source_network(vec![]);

        let report = net.step();

        assert_eq!(report.step, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.status, GrowthStatus::Growing);
        let child = net.nodes()[1];
        assert!(child.pos.distance(Vec2::new(0.0, 4.0)) < 1e-5);
        assert_eq!(child.parent, Some(0));
    }

    #[test]
    fn source_is_consumed_on_step_24_and_step_25_is_a_no_op() {
        let mut net = single_source_network(vec![]);

        for _ in 0..23 {
            let report = net.step();
            assert_eq!(report.consumed, 0);
            assert_eq!(report.alive_sources, 1);
        }

        let report = net.step();
        assert_eq!(report.step, 24);
        assert_eq!(report.consumed, 1);
        assert_eq!(report.status, GrowthStatus::Exhausted);
        assert!(net.sources().is_empty());
        let tip = net.nodes().last().unwrap();
        assert!(tip.pos.distance(Vec2::new(0.0, 96.0)) < 1e-3);

        let nodes_before = net.nodes().len();
        let report = net.step();
        assert_eq!(report.created, 0);
        assert_eq!(report.consumed, 0);
        assert_eq!(report.status, GrowthStatus::Exhausted);
        assert_eq!(net.nodes().len(), nodes_before);
        assert!(net.is_settled());
    }

    #[test]
    fn wall_across_the_approach_blocks_growth_forever() {
        let wall = Polygon::new(vec![
            Vec2::new(-50.0, 40.0),
            Vec2::new(50.0, 40.0),
            Vec2::new(50.0, 60.0),
            Vec2::new(-50.0, 60.0),
        ])
        .unwrap();
        let mut net = single_source_network(vec![wall.clone()]);

        let mut last = StepReport::default();
        for _ in 0..100 {
            last = net.step();
        }

        assert_eq!(last.status, GrowthStatus::Blocked);
        assert_eq!(last.alive_sources, 1);
        assert_eq!(net.alive_sources(), 1);
        assert!(net.nodes().iter().all(|n| !wall.contains(n.pos)));
        // Straight up to y = 36, then stuck.
        assert_eq!(net.nodes().len(), 10);
    }

    #[test]
    fn consuming_without_growing_is_not_settled() {
        let cfg = cfg();
        let sources = AttractorSet::from_positions(
            vec![Vec2::new(0.0, 3.0), Vec2::new(50.0, 0.0)],
            cfg.influence_radius,
            cfg.consume_radius,
        );
        // Covers the diagonal candidate (2.83, 2.83) but not (4, 0).
        let cap = Polygon::new(vec![
            Vec2::new(1.5, 1.5),
            Vec2::new(4.5, 1.5),
            Vec2::new(4.5, 4.5),
            Vec2::new(1.5, 4.5),
        ])
        .unwrap();
        let mut net = GrowthNetwork::new(square(100.0), vec![cap], sources, cfg);
        net.add_root(Vec2::ZERO).unwrap();

        let first = net.step();
        assert_eq!(first.created, 0);
        assert_eq!(first.blocked, 1);
        assert_eq!(first.consumed, 1);
        assert_eq!(first.status, GrowthStatus::Growing);
        assert!(!net.is_settled());

        let second = net.step();
        assert_eq!(second.created, 1);
        assert_eq!(second.status, GrowthStatus::Growing);
        assert!(net.nodes()[1].pos.distance(Vec2::new(4.0, 0.0)) < 1e-5);
    }

    #[test]
    fn step_without_nodes_or_sources_is_a_no_op() {
        let mut empty = GrowthNetwork::new(square(10.0), vec![], AttractorSet::default(), cfg());
        let report = empty.step();
        assert_eq!(report.created, 0);
        assert_eq!(report.status, GrowthStatus::Exhausted);

        let cfg = cfg();
        let sources =
            AttractorSet::from_positions(vec![Vec2::ZERO], cfg.influence_radius, cfg.consume_radius);
        let mut rootless = GrowthNetwork::new(square(10.0), vec![], sources, cfg);
        let report = rootless.step();
        assert_eq!(report.created, 0);
        assert_eq!(report.status, GrowthStatus::Dormant);
        assert_eq!(rootless.alive_sources(), 1);
    }

    #[test]
    fn add_root_rejects_blocked_positions() {
        let obstacle = square(5.0);
        let mut net = GrowthNetwork::new(square(100.0), vec![obstacle], AttractorSet::default(), cfg());

        assert_eq!(net.add_root(Vec2::ZERO), None);
        assert_eq!(net.add_root(Vec2::new(200.0, 0.0)), None);
        assert_eq!(net.add_root(Vec2::new(50.0, 0.0)), Some(0));
        assert!(net.nodes()[0].is_root);
    }

    #[test]
    fn roots_inside_consume_radius_consume_on_first_step() {
        let cfg = cfg();
        let sources = AttractorSet::from_positions(
            vec![Vec2::new(3.0, 0.0)],
            cfg.influence_radius,
            cfg.consume_radius,
        );
        let mut net = GrowthNetwork::new(square(100.0), vec![], sources, cfg);
        net.add_root(Vec2::ZERO);

        let report = net.step();
        assert_eq!(report.consumed, 1);
        assert_eq!(report.status, GrowthStatus::Exhausted);
    }
}
